//! CLI command handler: settings layering (defaults → config file → flags), then one sync run.

use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::github::GitHubClient;
use crate::pipeline::SyncJob;
use crate::store::open_store;
use crate::utils::config::PackagePaths;
use crate::utils::{apply_file_to_settings, get_token, load_sync_toml, setup_logging};
use crate::RunSettings;

/// Overwrite settings field from CLI when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $target:expr, $cli_field:ident => $target_field:ident) => {
        if let Some(v) = $cli.$cli_field.clone() {
            $target.$target_field = v;
        }
    };
}

/// Build run settings: defaults, then the config file in `dir` (or `--config`), then CLI flags.
pub fn resolve_settings(cli: &Cli, dir: &Path) -> Result<RunSettings> {
    let mut settings = RunSettings::default();
    if let Some(file) = load_sync_toml(cli.config.as_deref(), dir)? {
        apply_file_to_settings(&file, &mut settings);
    }
    if cli.db.is_some() {
        settings.db_path = cli.db.clone();
    }
    apply_cli_opt!(cli, settings, api_url => api_url);
    apply_cli_opt!(cli, settings.options, from => from);
    apply_cli_opt!(cli, settings.options, fetch_procs => num_fetch_procs);
    apply_cli_opt!(cli, settings.options, index_procs => num_index_procs);
    apply_cli_opt!(cli, settings.options, per_page => per_page);
    if let Some(secs) = cli.sleep {
        settings.options.sleep_per_page = Duration::from_secs(secs);
    }
    apply_cli_opt!(cli, settings.options, state => state);
    apply_cli_opt!(cli, settings.options, storage => storage);
    apply_cli_opt!(cli, settings, verbose => verbose);
    apply_cli_opt!(cli, settings, progress => progress);
    if !cli.repos.is_empty() {
        settings.repositories = cli.repos.clone();
    }
    Ok(settings)
}

/// Run one sync over every configured repository.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("read working directory")?;
    let settings = resolve_settings(cli, &cwd)?;
    setup_logging(settings.verbose);
    if settings.repositories.is_empty() {
        bail!("no repository to sync: pass OWNER/NAME or list [[repositories]] in the config file");
    }
    debug!("{:#?}", settings);

    let db_path = settings
        .db_path
        .clone()
        .unwrap_or_else(|| cwd.join(PackagePaths::get().db_filename()));
    let store = open_store(&db_path)?;
    let token = get_token(&cwd);
    let client = GitHubClient::new(&settings.api_url, token.as_deref())?;

    let job = SyncJob::new(Arc::new(client), Arc::new(store), settings.options)?
        .with_progress(settings.progress);
    info!(
        "syncing {} repositories into {} ({})",
        settings.repositories.len(),
        db_path.display(),
        settings.options.storage
    );
    job.run(&settings.repositories);
    Ok(())
}
