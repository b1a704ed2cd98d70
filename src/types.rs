//! Public types for the issuesync API: repositories, filters, storage modes and sync options.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::config::SyncDefaults;

/// A GitHub repository to synchronize. Read-only for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Owner (user or organization) login.
    pub user: String,
    /// Repository name.
    pub repo: String,
    /// Human-readable name used in logs. Defaults to `user/repo`.
    #[serde(default)]
    pub pretty_name: Option<String>,
    /// Resume cursor used when the sync options do not override it.
    #[serde(default)]
    pub start_index: u64,
}

impl Repository {
    pub fn new(user: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            repo: repo.into(),
            pretty_name: None,
            start_index: 0,
        }
    }

    pub fn with_start_index(mut self, start_index: u64) -> Self {
        self.start_index = start_index;
        self
    }

    /// `user/repo`. Used as the store key for this repository.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.user, self.repo)
    }

    pub fn pretty_name(&self) -> String {
        self.pretty_name
            .clone()
            .unwrap_or_else(|| self.full_name())
    }
}

impl FromStr for Repository {
    type Err = anyhow::Error;

    /// Parse `owner/name`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((user, repo))
                if !user.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Repository::new(user, repo))
            }
            _ => bail!("invalid repository {:?}: expected owner/name", s),
        }
    }
}

/// Listing-time filter on issue state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    All,
    #[default]
    Open,
    Closed,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::All => "all",
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StateFilter::All),
            "open" => Ok(StateFilter::Open),
            "closed" => Ok(StateFilter::Closed),
            other => bail!("invalid state filter {:?}: expected all, open or closed", other),
        }
    }
}

/// Destination selector for the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Point-in-time copy of the repository history.
    #[default]
    Snapshot,
    /// Current state, the one the live ingester keeps updated.
    Live,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Snapshot => "snapshot",
            StorageMode::Live => "live",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "snapshot" => Ok(StorageMode::Snapshot),
            "live" => Ok(StorageMode::Live),
            other => bail!("invalid storage mode {:?}: expected snapshot or live", other),
        }
    }
}

/// Shape of a stored document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Issue => "issue",
            ItemKind::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a synchronization job. Immutable once a run starts.
///
/// Start from [`SyncOptions::DEFAULT`] and override what you need:
///
/// ```ignore
/// let opts = SyncOptions { num_fetch_procs: 4, ..SyncOptions::DEFAULT };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    /// Index to start syncing from. 0 means use each repository's `start_index`.
    pub from: u64,
    /// Number of threads fetching pull request data in parallel. Also the enrichment queue capacity.
    pub num_fetch_procs: usize,
    /// Number of threads writing to the store in parallel. Also the persistence queue capacity.
    pub num_index_procs: usize,
    /// Page size used to compute the first page from `from`.
    pub per_page: u64,
    /// Pause after each listed page, to stay clear of abuse detection.
    pub sleep_per_page: Duration,
    /// Filter on issue state.
    pub state: StateFilter,
    /// Destination in the store.
    pub storage: StorageMode,
}

impl SyncOptions {
    pub const DEFAULT: SyncOptions = SyncOptions {
        from: SyncDefaults::FROM,
        num_fetch_procs: SyncDefaults::NUM_FETCH_PROCS,
        num_index_procs: SyncDefaults::NUM_INDEX_PROCS,
        per_page: SyncDefaults::PER_PAGE,
        sleep_per_page: Duration::from_secs(SyncDefaults::SLEEP_PER_PAGE_SECS),
        state: StateFilter::Open,
        storage: StorageMode::Snapshot,
    };

    /// Reject values that would deadlock or divide by zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_fetch_procs == 0 {
            bail!("num_fetch_procs must be > 0");
        }
        if self.num_index_procs == 0 {
            bail!("num_index_procs must be > 0");
        }
        if self.per_page == 0 {
            bail!("per_page must be > 0");
        }
        Ok(())
    }

    /// Start index for `repo`: the option wins when non-zero.
    pub fn effective_from(&self, repo: &Repository) -> u64 {
        if self.from == 0 {
            repo.start_index
        } else {
            self.from
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Full settings for a CLI run: sync options plus what the binary needs around them.
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub options: SyncOptions,
    /// Store database path. When None, uses the package default file name in the working directory.
    pub db_path: Option<std::path::PathBuf>,
    /// GitHub API root.
    pub api_url: String,
    pub verbose: bool,
    /// Show a stored-items counter per repository.
    pub progress: bool,
    pub repositories: Vec<Repository>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            options: SyncOptions::DEFAULT,
            db_path: None,
            api_url: crate::utils::config::GitHubConsts::API_URL.to_string(),
            verbose: false,
            progress: false,
            repositories: Vec::new(),
        }
    }
}
