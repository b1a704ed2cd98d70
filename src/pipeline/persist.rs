use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use log::error;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::blob::Blob;
use crate::engine::progress::update_progress_bar;
use crate::item::IndexedItem;

use super::context::WorkerContext;

/// Serialize `item`, build its blob and write it to the store.
pub fn persist_item(ctx: &WorkerContext, item: &IndexedItem) -> Result<()> {
    let (id, kind) = (item.id(), item.kind());
    // The blob is built from the serialized payload, not the typed item.
    let payload = item
        .to_json()
        .with_context(|| format!("error marshaling item {:?} ({})", id, kind))?;
    let blob = Blob::from_payload(kind, id.as_str(), &payload)
        .with_context(|| format!("creating blob from payload {:?} ({})", id, kind))?;
    ctx.store
        .store(ctx.options.storage, &ctx.repo, &blob)
}

/// Single index worker: drain the persistence queue until it is closed. Failures are logged and skipped.
fn index_worker_loop(ctx: Arc<WorkerContext>, index_rx: Receiver<IndexedItem>) {
    while let Ok(item) = index_rx.recv() {
        match persist_item(&ctx, &item) {
            Ok(()) => {
                ctx.counters.record_stored();
                if let Some(bar) = &ctx.progress {
                    update_progress_bar(bar, 1);
                }
            }
            Err(err) => {
                ctx.counters.record_index_failure();
                error!("{}: {:#}", ctx.repo.pretty_name(), err);
            }
        }
    }
}

/// Spawn `n` index workers on the persistence queue.
pub fn spawn_index_workers(
    ctx: &Arc<WorkerContext>,
    index_rx: &Receiver<IndexedItem>,
    n: usize,
) -> Vec<JoinHandle<()>> {
    (0..n)
        .map(|_| {
            let ctx = Arc::clone(ctx);
            let index_rx = index_rx.clone();
            thread::spawn(move || index_worker_loop(ctx, index_rx))
        })
        .collect()
}
