//! Canned contest data served by [`MockContestApi`](super::MockContestApi).

use shodh_api_types::{ContestDto, LeaderboardEntryDto, ProblemDto, TestCaseDto};

pub const CONTEST_ID: &str = "1";

/// Score credited for an accepted submission.
pub const ACCEPTED_SCORE: u16 = 30;

pub fn contest() -> ContestDto {
    ContestDto {
        id: CONTEST_ID.to_string(),
        name: "Shodh-a-Code Championship 2024".to_string(),
        description: "Welcome to the ultimate coding championship! Solve challenging problems \
                      and climb the leaderboard."
            .to_string(),
        start_time: "2024-01-15T09:00:00".to_string(),
        end_time: "2024-01-22T18:00:00".to_string(),
        problems: vec![two_sum(), palindrome_number(), longest_substring()],
    }
}

pub fn leaderboard() -> Vec<LeaderboardEntryDto> {
    vec![
        leaderboard_entry("alice_coder", "Alice Coder", 90, 3, "2024-01-15T14:30:00"),
        leaderboard_entry("bob_dev", "Bob Developer", 60, 2, "2024-01-15T14:25:00"),
        leaderboard_entry("charlie_hacker", "Charlie Hacker", 30, 1, "2024-01-15T14:20:00"),
    ]
}

fn leaderboard_entry(
    user_id: &str,
    username: &str,
    total_score: u32,
    problems_solved: u32,
    last_submission_time: &str,
) -> LeaderboardEntryDto {
    LeaderboardEntryDto {
        user_id: user_id.to_string(),
        username: username.to_string(),
        total_score,
        problems_solved,
        last_submission_time: last_submission_time.to_string(),
    }
}

fn test_case(id: &str, input: &str, expected_output: &str) -> TestCaseDto {
    TestCaseDto {
        id: id.to_string(),
        input: input.to_string(),
        expected_output: expected_output.to_string(),
    }
}

fn two_sum() -> ProblemDto {
    ProblemDto {
        id: "1".to_string(),
        title: "Two Sum".to_string(),
        description: "Given an array of integers nums and an integer target, return indices of \
the two numbers such that they add up to target.

You may assume that each input would have exactly one solution, and you may not use the same \
element twice.

You can return the answer in any order.

Example 1:
Input: nums = [2,7,11,15], target = 9
Output: [0,1]
Explanation: Because nums[0] + nums[1] == 9, we return [0, 1].

Example 2:
Input: nums = [3,2,4], target = 6
Output: [1,2]

Example 3:
Input: nums = [3,3], target = 6
Output: [0,1]"
            .to_string(),
        difficulty: "Easy".to_string(),
        time_limit: 2,
        memory_limit: 128,
        test_cases: vec![
            test_case("1", "[2,7,11,15]\n9", "[0,1]"),
            test_case("2", "[3,2,4]\n6", "[1,2]"),
            test_case("3", "[3,3]\n6", "[0,1]"),
        ],
    }
}

fn palindrome_number() -> ProblemDto {
    ProblemDto {
        id: "2".to_string(),
        title: "Palindrome Number".to_string(),
        description: "Given an integer x, return true if x is a palindrome integer.

An integer is a palindrome when it reads the same backward as forward.

For example, 121 is a palindrome while 123 is not.

Example 1:
Input: x = 121
Output: true
Explanation: 121 reads as 121 from left to right and from right to left.

Example 2:
Input: x = -121
Output: false
Explanation: From left to right, it reads -121. From right to left, it becomes 121-. \
Therefore it is not a palindrome.

Example 3:
Input: x = 10
Output: false
Explanation: Reads 01 from right to left. Therefore it is not a palindrome."
            .to_string(),
        difficulty: "Easy".to_string(),
        time_limit: 1,
        memory_limit: 64,
        test_cases: vec![
            test_case("4", "121", "true"),
            test_case("5", "-121", "false"),
            test_case("6", "10", "false"),
        ],
    }
}

fn longest_substring() -> ProblemDto {
    ProblemDto {
        id: "3".to_string(),
        title: "Longest Substring Without Repeating Characters".to_string(),
        description: "Given a string s, find the length of the longest substring without \
repeating characters.

Example 1:
Input: s = \"abcabcbb\"
Output: 3
Explanation: The answer is \"abc\", with the length of 3.

Example 2:
Input: s = \"bbbbb\"
Output: 1
Explanation: The answer is \"b\", with the length of 1.

Example 3:
Input: s = \"pwwkew\"
Output: 3
Explanation: The answer is \"wke\", with the length of 3.
Notice that the answer must be a substring, \"pwke\" is a subsequence and not a substring."
            .to_string(),
        difficulty: "Medium".to_string(),
        time_limit: 3,
        memory_limit: 256,
        test_cases: vec![
            test_case("7", "abcabcbb", "3"),
            test_case("8", "bbbbb", "1"),
            test_case("9", "pwwkew", "3"),
        ],
    }
}
