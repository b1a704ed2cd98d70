//! issuesync: bulk synchronization of GitHub issues and pull requests into a document store

pub mod blob;
pub mod engine;
pub mod github;
pub mod item;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use blob::Blob;
pub use item::{IndexedItem, MergedPullRequest, classify};
pub use pipeline::{SyncJob, SyncReport};

use log::debug;
use std::sync::Arc;

use crate::github::IssueSource;
use crate::store::BlobStore;

/// Result alias used by public issuesync API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: sync every repository in `repos` with `opts`, in order. Blocks until all are done.
///
/// Nothing is returned: listing, fetch and store failures are logged and never abort the run.
/// Invalid `opts` (zero pool or page size) are logged and nothing is synced.
pub fn run_sync(
    source: Arc<dyn IssueSource>,
    store: Arc<dyn BlobStore>,
    repos: &[Repository],
    opts: &SyncOptions,
) {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    match SyncJob::new(source, store, *opts) {
        Ok(job) => job.run(repos),
        Err(err) => log::error!("invalid sync options: {:#}", err),
    }
}
