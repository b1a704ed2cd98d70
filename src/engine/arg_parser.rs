use clap::Parser;
use std::path::PathBuf;

use crate::{Repository, StateFilter, StorageMode};

/// Bulk sync of GitHub issues and pull requests into a document store.
#[derive(Clone, Parser)]
#[command(name = "issuesync")]
#[command(
    about = "Sync the issue and pull request history of GitHub repositories into the store."
)]
pub struct Cli {
    /// Repositories to sync (owner/name). Replaces the config file's list when given.
    #[arg(value_name = "OWNER/NAME")]
    pub repos: Vec<Repository>,

    /// Config file. Default: `.issuesync.toml` in the working directory, if present.
    #[arg(long, short = 'C')]
    pub config: Option<PathBuf>,

    /// Path to the store database. Default: `issuesync.db` in the working directory.
    #[arg(long, short)]
    pub db: Option<PathBuf>,

    /// Index to start syncing from. Overrides every repository's start index when non-zero.
    #[arg(long, short)]
    pub from: Option<u64>,

    /// Number of threads fetching pull requests in parallel.
    #[arg(long)]
    pub fetch_procs: Option<usize>,

    /// Number of threads writing to the store in parallel.
    #[arg(long)]
    pub index_procs: Option<usize>,

    /// Page size used to compute the first page to list from --from.
    #[arg(long)]
    pub per_page: Option<u64>,

    /// Seconds to sleep after each listed page (avoids GitHub abuse detection).
    #[arg(long, short)]
    pub sleep: Option<u64>,

    /// Issue state filter: all, open or closed.
    #[arg(long)]
    pub state: Option<StateFilter>,

    /// Store destination: snapshot or live.
    #[arg(long)]
    pub storage: Option<StorageMode>,

    /// GitHub API root (for GitHub Enterprise, e.g. https://ghe.example.com/api/v3).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Show a counter of stored items per repository.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,
}
