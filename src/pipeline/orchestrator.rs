use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;
use log::{debug, error, info};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::progress::{create_counter, finish_bar};
use crate::github::{Issue, IssueSource};
use crate::item::{IndexedItem, classify};
use crate::store::BlobStore;
use crate::{ItemKind, Repository, SyncOptions};

use super::context::{SyncChannels, WorkerContext, create_sync_channels};
use super::fetch::spawn_fetch_workers;
use super::lister::{ListedPage, PageLister};
use super::persist::spawn_index_workers;
use super::report::{SyncCounters, SyncReport, log_sync_report};

/// Coordinator state for one repository. A run cycles through all four per repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    /// Pages are listed and routed; both pools are running.
    Listing,
    /// Enrichment queue closed; waiting for fetch workers.
    DrainingFetch,
    /// Persistence queue closed; waiting for index workers.
    DrainingIndex,
}

fn enter_phase(repo: &Repository, phase: SyncPhase) {
    debug!("{}: {:?}", repo.pretty_name(), phase);
}

/// A synchronization job: one source, one store, one immutable set of options.
pub struct SyncJob {
    source: Arc<dyn IssueSource>,
    store: Arc<dyn BlobStore>,
    options: SyncOptions,
    progress: bool,
}

impl SyncJob {
    /// Create a job with `options`. Fails on options that cannot run (zero pool or page size).
    pub fn new(
        source: Arc<dyn IssueSource>,
        store: Arc<dyn BlobStore>,
        options: SyncOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            source,
            store,
            options,
            progress: false,
        })
    }

    /// Create a job with [`SyncOptions::DEFAULT`].
    pub fn with_defaults(source: Arc<dyn IssueSource>, store: Arc<dyn BlobStore>) -> Self {
        Self {
            source,
            store,
            options: SyncOptions::DEFAULT,
            progress: false,
        }
    }

    /// Show a stored-items counter while each repository syncs.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Sync `repos` one after the other. Returns once every repository has been listed,
    /// enriched and indexed. Failures only show up in the log.
    ///
    /// Isolated errors (one pull request fetch, one store write) do not interrupt the job.
    /// A listing failure ends that repository's listing early; what was already queued is
    /// still processed and the job moves on to the next repository.
    pub fn run(&self, repos: &[Repository]) {
        for repo in repos {
            let _ = self.sync_repository(repo);
        }
    }

    /// One full cycle for `repo`: spawn both pools, list and route, then drain the
    /// enrichment queue before the persistence queue.
    pub fn sync_repository(&self, repo: &Repository) -> SyncReport {
        let counters = Arc::new(SyncCounters::default());
        let ctx = Arc::new(WorkerContext {
            repo: repo.clone(),
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            options: self.options,
            counters: Arc::clone(&counters),
            progress: self
                .progress
                .then(|| create_counter(repo.pretty_name(), " items")),
        });

        let SyncChannels {
            fetch_tx,
            fetch_rx,
            index_tx,
            index_rx,
        } = create_sync_channels(&self.options);

        enter_phase(repo, SyncPhase::Listing);
        let index_handles = spawn_index_workers(&ctx, &index_rx, self.options.num_index_procs);
        let fetch_handles =
            spawn_fetch_workers(&ctx, &fetch_rx, &index_tx, self.options.num_fetch_procs);
        // Only workers receive.
        drop(fetch_rx);
        drop(index_rx);

        // An explicit `from` overrides the repository's configured start index.
        let from = self.options.effective_from(repo);
        let listing_error = match fetch_repository_items(&ctx, from, &fetch_tx, &index_tx) {
            Ok(count) => {
                debug!("{}: listing done, {} items", repo.pretty_name(), count);
                None
            }
            Err(err) => {
                error!(
                    "error syncing repository {} issues: {:#}",
                    repo.pretty_name(),
                    err
                );
                Some(format!("{err:#}"))
            }
        };

        // Everything to fetch is queued.
        drop(fetch_tx);
        enter_phase(repo, SyncPhase::DrainingFetch);
        join_pool(repo, "fetch", fetch_handles);
        info!("{}: done fetching GitHub API data", repo.pretty_name());

        // Fetch workers have released their senders; everything to index is queued.
        drop(index_tx);
        enter_phase(repo, SyncPhase::DrainingIndex);
        join_pool(repo, "index", index_handles);
        info!("{}: done indexing documents", repo.pretty_name());

        if let Some(bar) = &ctx.progress {
            finish_bar(bar);
        }
        let report = counters.report(listing_error);
        log_sync_report(repo, &report);
        enter_phase(repo, SyncPhase::Idle);
        report
    }
}

/// List every issue of the repository from `from` on and route each record. Returns the
/// number of records listed. Any listing error is returned and ends listing.
///
/// Plain issues go straight to the index queue. Pull requests go to the fetch queue to be
/// enriched: the issue view holds the labels, the pull request view holds the rest.
/// Routing happens before the next page is requested, so full queues hold the lister back.
fn fetch_repository_items(
    ctx: &WorkerContext,
    from: u64,
    fetch_tx: &Sender<Issue>,
    index_tx: &Sender<IndexedItem>,
) -> Result<usize> {
    let mut lister = PageLister::new(
        ctx.source.as_ref(),
        &ctx.repo,
        from,
        ctx.options.per_page,
        ctx.options.state,
        ctx.options.sleep_per_page,
    );
    for page in lister.by_ref() {
        let ListedPage { issues, .. } = page?;
        for issue in issues {
            route_issue(&ctx.counters, issue, fetch_tx, index_tx)?;
        }
    }
    Ok(lister.listed())
}

/// Send `issue` to the queue its classification calls for. Blocks while that queue is full.
pub fn route_issue(
    counters: &SyncCounters,
    issue: Issue,
    fetch_tx: &Sender<Issue>,
    index_tx: &Sender<IndexedItem>,
) -> Result<()> {
    let kind = classify(&issue);
    counters.record_listed(kind);
    match kind {
        ItemKind::Issue => index_tx
            .send(IndexedItem::Issue(issue))
            .map_err(|_| anyhow!("index queue closed: no index worker left")),
        ItemKind::PullRequest => fetch_tx
            .send(issue)
            .map_err(|_| anyhow!("fetch queue closed: no fetch worker left")),
    }
}

/// Wait for every worker of a pool. A panicked worker is logged, not propagated.
fn join_pool(repo: &Repository, pool: &str, handles: Vec<JoinHandle<()>>) {
    for h in handles {
        if h.join().is_err() {
            error!("{}: {} worker panicked", repo.pretty_name(), pool);
        }
    }
}
