use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Language a submission is written in. Only a label; nothing is executed.
///
/// Submissions read back from a backend may carry languages this client does
/// not list; those are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Java,
    Cpp,
    C,
    Rust,
    Go,
    TypeScript,
    Other(String),
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Rust,
        Language::Go,
        Language::TypeScript,
    ];

    /// Lowercase identifier used on the wire.
    pub fn code(&self) -> &str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::TypeScript => "typescript",
            Self::Other(label) => label,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::TypeScript => "TypeScript",
            Self::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Lenient parse for labels reported by a backend.
    pub fn from_label(label: &str) -> Self {
        label
            .parse()
            .unwrap_or_else(|_| Self::Other(label.trim().to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Strict parse: accepts only the listed languages and their aliases.
impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "c++" => Ok(Self::Cpp),
            "js" => Ok(Self::JavaScript),
            "ts" => Ok(Self::TypeScript),
            "py" => Ok(Self::Python),
            code => Self::ALL
                .into_iter()
                .find(|language| language.code() == code)
                .ok_or_else(|| DomainError::UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_codes_and_aliases() {
        assert_eq!("javascript".parse::<Language>(), Ok(Language::JavaScript));
        assert_eq!("C++".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!(" Python ".parse::<Language>(), Ok(Language::Python));
    }

    #[test]
    fn rejects_unknown_language() {
        let err = "cobol".parse::<Language>().expect_err("cobol is not supported");

        assert_eq!(err, DomainError::UnknownLanguage("cobol".to_string()));
    }

    #[test]
    fn backend_labels_outside_the_list_are_kept() {
        let kotlin = Language::from_label(" kotlin ");

        assert_eq!(kotlin, Language::Other("kotlin".to_string()));
        assert_eq!(kotlin.code(), "kotlin");
        assert!(!kotlin.is_known());
        assert_eq!(Language::from_label("py"), Language::Python);
        assert!(Language::from_label("py").is_known());
    }
}
