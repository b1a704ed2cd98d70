use log::{info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{ItemKind, Repository};

/// Counters updated by the coordinator and workers of one repository run.
#[derive(Debug, Default)]
pub struct SyncCounters {
    listed: AtomicUsize,
    issues: AtomicUsize,
    pull_requests: AtomicUsize,
    fetch_failures: AtomicUsize,
    index_failures: AtomicUsize,
    stored: AtomicUsize,
}

impl SyncCounters {
    pub fn record_listed(&self, kind: ItemKind) {
        self.listed.fetch_add(1, Ordering::Relaxed);
        match kind {
            ItemKind::Issue => self.issues.fetch_add(1, Ordering::Relaxed),
            ItemKind::PullRequest => self.pull_requests.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_index_failure(&self) {
        self.index_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stored(&self) {
        self.stored.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters. Call after both pools have been joined.
    pub fn report(&self, listing_error: Option<String>) -> SyncReport {
        SyncReport {
            listed: self.listed.load(Ordering::Relaxed),
            issues: self.issues.load(Ordering::Relaxed),
            pull_requests: self.pull_requests.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            index_failures: self.index_failures.load(Ordering::Relaxed),
            stored: self.stored.load(Ordering::Relaxed),
            listing_error,
        }
    }
}

/// Outcome of syncing one repository.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Records yielded by the listing (issues + pull requests).
    pub listed: usize,
    pub issues: usize,
    pub pull_requests: usize,
    /// Pull requests stored unenriched because their fetch failed.
    pub fetch_failures: usize,
    /// Items dropped on serialization, blob or store errors.
    pub index_failures: usize,
    pub stored: usize,
    /// Set when listing stopped early; the repository is partially synced.
    pub listing_error: Option<String>,
}

impl SyncReport {
    pub fn is_partial(&self) -> bool {
        self.listing_error.is_some()
    }

    pub fn has_gaps(&self) -> bool {
        self.index_failures > 0
    }
}

/// Log the end-of-repository summary.
pub fn log_sync_report(repo: &Repository, report: &SyncReport) {
    info!(
        "{}: listed {} ({} issues, {} pull requests), stored {}",
        repo.pretty_name(),
        report.listed,
        report.issues,
        report.pull_requests,
        report.stored
    );
    if report.fetch_failures > 0 {
        warn!(
            "{}: {} pull requests stored without enrichment",
            repo.pretty_name(),
            report.fetch_failures
        );
    }
    if report.has_gaps() {
        warn!(
            "{}: {} items could not be stored",
            repo.pretty_name(),
            report.index_failures
        );
    }
    if let Some(err) = &report.listing_error {
        warn!(
            "{}: partially synced, listing stopped early: {}",
            repo.pretty_name(),
            err
        );
    }
}
