//! Offline analysis CLI for the faultline correlation engine.
//!
//! Provides the `faultline` binary for one-shot analysis without the
//! HTTP server: build the dependency graph from a commit log and a
//! source tree, normalize a failure event, and print the ranked
//! diagnosis as JSON. Uses the same normalizer and engine as the server
//! endpoints, ensuring identical results from both entry points.

use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use faultline_core::graph::{DependencyGraphStore, MapSourceProvider};
use faultline_core::{BuildEvent, CommitEvent, EngineConfig};
use faultline_correlate::{correlate, CorrelationRequest, TokenOverlap};
use faultline_feedback::{FeedbackStore, MemoryFeedback, SqliteFeedback};
use faultline_signal::{failure_summary, normalize, LogPatterns};

/// Root-cause correlation tools.
#[derive(Parser)]
#[command(name = "faultline", about = "Root-cause correlation tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Correlate a failure event against a commit log and source tree.
    Analyze {
        /// Path to the BuildEvent JSON file.
        #[arg(short, long)]
        event: PathBuf,

        /// Path to a JSON array of CommitEvents, oldest first.
        #[arg(short, long)]
        commits: PathBuf,

        /// Repository root the commit file paths are relative to.
        #[arg(short, long)]
        repo: PathBuf,

        /// Engine configuration JSON (default: built-in defaults).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Feedback SQLite database (default: no history).
        #[arg(long)]
        db: Option<String>,
    },

    /// Normalize a failure event and print its signals and summary.
    Signals {
        /// Path to the BuildEvent JSON file.
        #[arg(short, long)]
        event: PathBuf,

        /// Path to a JSON array of CommitEvents, oldest first.
        #[arg(short, long)]
        commits: PathBuf,

        /// Repository root the commit file paths are relative to.
        #[arg(short, long)]
        repo: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Analyze {
            event,
            commits,
            repo,
            config,
            db,
        } => run_analyze(&event, &commits, &repo, config.as_deref(), db.as_deref()),
        Commands::Signals {
            event,
            commits,
            repo,
        } => run_signals(&event, &commits, &repo),
    };
    process::exit(exit_code);
}

/// Execute the analyze subcommand.
///
/// Exit codes: 0 = diagnosis with candidates, 1 = empty diagnosis
/// (insufficient evidence or nothing above the floor), 2 = invalid
/// input or configuration, 3 = I/O error.
fn run_analyze(
    event_path: &Path,
    commits_path: &Path,
    repo: &Path,
    config_path: Option<&Path>,
    db_path: Option<&str>,
) -> i32 {
    let (event, window, snapshot) = match load_inputs(event_path, commits_path, repo) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };

    let config = match config_path {
        None => EngineConfig::default(),
        Some(path) => match read_json::<EngineConfig>(path) {
            Ok(config) => config,
            Err(code) => return code,
        },
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: invalid configuration: {}", e);
        return 2;
    }

    let feedback: Box<dyn FeedbackStore> = match db_path {
        None => Box::new(MemoryFeedback::new()),
        Some(path) => match SqliteFeedback::open(path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                eprintln!("Error: failed to open feedback database '{}': {}", path, e);
                return 3;
            }
        },
    };

    let patterns = LogPatterns::new();
    let signals = normalize(&patterns, &event, &snapshot);
    let request = CorrelationRequest {
        event_id: event.event_id.clone(),
        signals: &signals,
        commit_window: &window,
        snapshot: &snapshot,
        config: &config,
        now_ms: now_epoch_ms(),
        deadline: None,
    };
    let diagnosis = match correlate(&request, &TokenOverlap, feedback.as_ref()) {
        Ok(diagnosis) => diagnosis,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    match serde_json::to_string_pretty(&diagnosis) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: failed to serialize diagnosis: {}", e);
            return 3;
        }
    }
    if diagnosis.entries.is_empty() {
        1
    } else {
        0
    }
}

/// Execute the signals subcommand. Exit codes as for analyze, except 0
/// is returned even when no signals were extracted.
fn run_signals(event_path: &Path, commits_path: &Path, repo: &Path) -> i32 {
    let (event, _, snapshot) = match load_inputs(event_path, commits_path, repo) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };

    let patterns = LogPatterns::new();
    let signals = normalize(&patterns, &event, &snapshot);
    match serde_json::to_string_pretty(&signals) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: failed to serialize signals: {}", e);
            return 3;
        }
    }
    eprintln!("summary: {}", failure_summary(&signals));
    0
}

/// Loads the event and commit log, then replays the commits against a
/// fresh store with file contents read from the repository root.
fn load_inputs(
    event_path: &Path,
    commits_path: &Path,
    repo: &Path,
) -> Result<
    (
        BuildEvent,
        Vec<CommitEvent>,
        std::sync::Arc<faultline_core::GraphSnapshot>,
    ),
    i32,
> {
    let event: BuildEvent = read_json(event_path)?;
    let window: Vec<CommitEvent> = read_json(commits_path)?;

    let mut store = DependencyGraphStore::new(EngineConfig::default().version_horizon);
    for commit in &window {
        let mut sources = MapSourceProvider::new();
        for path in commit.touched_paths() {
            // Missing or unreadable files degrade that subtree locally.
            if let Ok(content) = std::fs::read_to_string(repo.join(path)) {
                sources.insert(path, content);
            }
        }
        if let Err(e) = store.apply_commit(commit, &sources) {
            eprintln!("Error: failed to apply commit {}: {}", commit.id, e);
            return Err(2);
        }
    }
    Ok((event, window, store.latest()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, i32> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", path.display(), e);
            return Err(3);
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            eprintln!("Error: failed to parse '{}': {}", path.display(), e);
            Err(2)
        }
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
