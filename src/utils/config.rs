//! Application configuration constants.
//! Defaults and API settings in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    db_filename: String,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                db_filename: format!("{pkg}.db"),
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Default store database file name.
    pub fn db_filename(&self) -> &str {
        &self.db_filename
    }

    /// Config file looked up in the working directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Sync job ----

/// Defaults behind [`SyncOptions::DEFAULT`](crate::SyncOptions::DEFAULT).
pub struct SyncDefaults;

impl SyncDefaults {
    /// 0 defers to each repository's configured start index.
    pub const FROM: u64 = 0;
    pub const NUM_FETCH_PROCS: usize = 20;
    pub const NUM_INDEX_PROCS: usize = 5;
    pub const PER_PAGE: u64 = 100;
    pub const SLEEP_PER_PAGE_SECS: u64 = 0;
}

// ---- GitHub API ----

pub struct GitHubConsts;

impl GitHubConsts {
    pub const API_URL: &'static str = "https://api.github.com";
    pub const ACCEPT: &'static str = "application/vnd.github+json";
    pub const API_VERSION: &'static str = "2022-11-28";
    pub const USER_AGENT: &'static str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
    /// The issues endpoint caps `per_page` at 100; listing always asks for the maximum.
    pub const MAX_PER_PAGE: u64 = 100;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Environment variable holding the API token (also read from `.env`).
    pub const TOKEN_ENV: &'static str = "GITHUB_TOKEN";
}

// ---- Store ----

/// How long a writer waits on a locked SQLite database before failing.
pub const STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
