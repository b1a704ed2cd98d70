use crossbeam_channel::{Receiver, Sender};
use log::{debug, error};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::github::Issue;
use crate::item::{IndexedItem, MergedPullRequest};

use super::context::WorkerContext;

/// Fetch the pull request behind `issue` and merge the two views. On failure, logs and
/// returns the issue unenriched so it is still stored.
pub fn enrich_pull_request(ctx: &WorkerContext, issue: Issue) -> IndexedItem {
    debug!("fetching associated pull request for issue {}", issue.number);
    match ctx
        .source
        .get_pull_request(&ctx.repo.user, &ctx.repo.repo, issue.number)
    {
        Ok(pr) => MergedPullRequest::new(pr, Some(&issue)).into(),
        Err(err) => {
            ctx.counters.record_fetch_failure();
            error!(
                "{}: fail to retrieve pull request information for {}: {:#}",
                ctx.repo.pretty_name(),
                issue.number,
                err
            );
            IndexedItem::Issue(issue)
        }
    }
}

/// Single fetch worker: drain the enrichment queue until it is closed, push results on the index queue.
fn fetch_worker_loop(ctx: Arc<WorkerContext>, fetch_rx: Receiver<Issue>, index_tx: Sender<IndexedItem>) {
    while let Ok(issue) = fetch_rx.recv() {
        let item = enrich_pull_request(&ctx, issue);
        if index_tx.send(item).is_err() {
            error!(
                "{}: index queue closed before fetch workers finished",
                ctx.repo.pretty_name()
            );
            break;
        }
    }
    drop(index_tx);
}

/// Spawn `n` fetch workers. Each holds its own `index_tx` clone, released when it exits.
pub fn spawn_fetch_workers(
    ctx: &Arc<WorkerContext>,
    fetch_rx: &Receiver<Issue>,
    index_tx: &Sender<IndexedItem>,
    n: usize,
) -> Vec<JoinHandle<()>> {
    (0..n)
        .map(|_| {
            let ctx = Arc::clone(ctx);
            let fetch_rx = fetch_rx.clone();
            let index_tx = index_tx.clone();
            thread::spawn(move || fetch_worker_loop(ctx, fetch_rx, index_tx))
        })
        .collect()
}
