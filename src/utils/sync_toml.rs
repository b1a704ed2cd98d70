//! Load `.issuesync.toml` (CLI only). Lib callers build [`SyncOptions`](crate::SyncOptions) directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::config::PackagePaths;
use crate::{Repository, RunSettings, StateFilter, StorageMode};

#[derive(Debug, Default, Deserialize)]
pub struct SyncToml {
    #[serde(default)]
    settings: SettingsSection,
    #[serde(default)]
    repositories: Vec<Repository>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    db_path: Option<String>,
    api_url: Option<String>,
    from: Option<u64>,
    fetch_procs: Option<usize>,
    index_procs: Option<usize>,
    per_page: Option<u64>,
    sleep_per_page: Option<u64>,
    state: Option<StateFilter>,
    storage: Option<StorageMode>,
    verbose: Option<bool>,
    progress: Option<bool>,
}

impl SyncToml {
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse sync config")
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }
}

/// Load the config at `path` (relative to `dir`, must exist) when given, else `.issuesync.toml` in `dir` if present.
pub fn load_sync_toml(path: Option<&Path>, dir: &Path) -> Result<Option<SyncToml>> {
    let (path, required) = match path {
        Some(p) => (dir.join(p), true),
        None => (dir.join(PackagePaths::get().config_filename()), false),
    };
    if !required && !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    SyncToml::parse(&s)
        .with_context(|| format!("in {}", path.display()))
        .map(Some)
}

/// Overwrite settings field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $target:expr, $sec_field:ident => $target_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $target.$target_field = v;
        }
    };
}

/// Apply file config to settings (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_settings(file: &SyncToml, settings: &mut RunSettings) {
    let sec = &file.settings;
    if let Some(ref p) = sec.db_path {
        settings.db_path = Some(PathBuf::from(p));
    }
    if let Some(ref url) = sec.api_url {
        settings.api_url = url.clone();
    }
    apply_file_opt!(sec, settings.options, from => from);
    apply_file_opt!(sec, settings.options, fetch_procs => num_fetch_procs);
    apply_file_opt!(sec, settings.options, index_procs => num_index_procs);
    apply_file_opt!(sec, settings.options, per_page => per_page);
    if let Some(secs) = sec.sleep_per_page {
        settings.options.sleep_per_page = Duration::from_secs(secs);
    }
    apply_file_opt!(sec, settings.options, state => state);
    apply_file_opt!(sec, settings.options, storage => storage);
    apply_file_opt!(sec, settings, verbose => verbose);
    apply_file_opt!(sec, settings, progress => progress);
    if !file.repositories.is_empty() {
        settings.repositories = file.repositories.clone();
    }
}
