use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use contest_client::{ClientConfig, ClientEvent, ContestClient, PollState};
use shodh_core::domain::{Contest, Language, Leaderboard, ProblemId, Username};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "shodh.toml";

#[derive(Parser, Debug)]
#[command(name = "shodh-console")]
#[command(about = "Join a contest, submit code and follow the verdict", long_about = None)]
#[command(version)]
struct Args {
    /// Contest to join
    #[arg(long)]
    contest: String,

    /// Name shown on the leaderboard
    #[arg(long, default_value = Username::ANONYMOUS)]
    username: String,

    /// Client config file (defaults to ./shodh.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Problem to submit to (defaults to the first problem)
    #[arg(long)]
    problem: Option<String>,

    /// Language of the source file
    #[arg(long, default_value = "javascript")]
    language: Language,

    /// Source file to submit
    #[arg(long)]
    source: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let client = ContestClient::new(config).context("failed to initialize contest client")?;
    let mut event_stream = client.subscribe_events();

    let mut session = client
        .join(&args.contest, &args.username)
        .context("failed to join contest")?;
    let contest = session.load().await.context("failed to load contest")?;
    log_contest(contest);
    log_leaderboard(session.leaderboard());

    if let Some(problem) = args.problem.as_deref() {
        let problem_id = ProblemId::new(problem)?;
        let problem = session
            .select_problem(&problem_id)
            .with_context(|| format!("cannot select problem {problem_id}"))?;
        info!(id = %problem.id, title = %problem.title, "problem selected");
    }

    let follow_submission = match args.source.as_deref() {
        Some(path) => {
            let code = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read source file: {}", path.display()))?;
            let submission_id = session
                .submit(&code, args.language)
                .await
                .context("failed to submit code")?;
            info!(submission_id = %submission_id, "waiting for verdict");
            true
        }
        None => false,
    };

    let leaderboard = session.watch_leaderboard();
    info!("press Ctrl+C to leave the contest");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, leaving contest");
                break;
            }
            event = event_stream.recv() => {
                match event {
                    Ok(ClientEvent::PollStateChanged { state }) => {
                        log_poll_state(&state);
                        if follow_submission && state.is_finished() {
                            break;
                        }
                    }
                    Ok(ClientEvent::LeaderboardUpdated { .. }) => {
                        log_podium(&leaderboard.snapshot().leaderboard);
                    }
                    Ok(event) => info!(?event, "client event"),
                    Err(err) => match lagged_events(&err) {
                        Some(skipped) => {
                            warn!(skipped, "console fell behind the client event stream");
                        }
                        None => {
                            warn!(error = %err, "failed to receive client event");
                            break;
                        }
                    },
                }
            }
        }
    }

    leaderboard.stop();
    session.stop_polling();
    info!("console shutdown complete");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading client config");
            ClientConfig::from_file(path)
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!(path = DEFAULT_CONFIG_PATH, "loading client config");
            ClientConfig::from_file(DEFAULT_CONFIG_PATH)
        }
        None => {
            info!("no config file found, using the mock backend");
            Ok(ClientConfig::default())
        }
    }
}

fn log_contest(contest: &Contest) {
    info!(
        id = %contest.id,
        name = %contest.name,
        start = %contest.start_time,
        end = %contest.end_time,
        problems = contest.problems.len(),
        running = contest.is_running_at(Utc::now().naive_utc()),
        "contest"
    );
    for problem in &contest.problems {
        info!(
            label = %contest.problem_label(&problem.id).unwrap_or_default(),
            id = %problem.id,
            title = %problem.title,
            difficulty = %problem.difficulty,
            time_limit_secs = problem.time_limit_secs,
            memory_limit_mb = problem.memory_limit_mb,
            samples = problem.sample_test_cases().len(),
            "problem"
        );
    }
}

fn log_leaderboard(leaderboard: &Leaderboard) {
    if leaderboard.is_empty() {
        info!("leaderboard is empty");
        return;
    }
    for (index, entry) in leaderboard.entries().iter().enumerate() {
        info!(
            rank = index + 1,
            username = %entry.username,
            score = entry.total_score,
            solved = entry.problems_solved,
            "standing"
        );
    }
}

fn log_podium(leaderboard: &Leaderboard) {
    for (index, entry) in leaderboard.podium().iter().enumerate() {
        info!(
            rank = index + 1,
            username = %entry.username,
            score = entry.total_score,
            "leaderboard updated"
        );
    }
}

/// Number of skipped events when the stream lagged; `None` for errors that end it.
fn lagged_events(err: &anyhow::Error) -> Option<u64> {
    match err.downcast_ref::<RecvError>() {
        Some(RecvError::Lagged(skipped)) => Some(*skipped),
        _ => None,
    }
}

fn log_poll_state(state: &PollState) {
    match state {
        PollState::Idle => {}
        PollState::Loading {
            submission_id,
            attempt,
            latest,
        } => match latest {
            Some(submission) => info!(
                submission_id = %submission_id,
                attempt,
                status = %submission.status,
                "judging"
            ),
            None => info!(submission_id = %submission_id, "submission queued"),
        },
        PollState::Resolved(submission) => info!(
            submission_id = %submission.id,
            status = %submission.status,
            score = submission.score.value(),
            execution_time_ms = submission.execution_time_ms,
            memory_used_kb = submission.memory_used_kb,
            "verdict"
        ),
        PollState::Failed {
            submission_id,
            message,
        } => warn!(submission_id = %submission_id, "{message}"),
    }
}
