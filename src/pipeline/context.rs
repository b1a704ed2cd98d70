//! Per-repository channels and the shared context handed to every worker.

use crossbeam_channel::{Receiver, Sender, bounded};
use kdam::Bar;
use std::sync::{Arc, Mutex};

use crate::github::{Issue, IssueSource};
use crate::item::IndexedItem;
use crate::store::BlobStore;
use crate::{Repository, SyncOptions};

use super::report::SyncCounters;

/// Read-only state shared by the coordinator and both worker pools for one repository.
pub struct WorkerContext {
    pub repo: Repository,
    pub source: Arc<dyn IssueSource>,
    pub store: Arc<dyn BlobStore>,
    pub options: SyncOptions,
    pub counters: Arc<SyncCounters>,
    /// Stored-items counter, when progress display is on.
    pub progress: Option<Arc<Mutex<Bar>>>,
}

/// The two work queues of one repository run. Created fresh per repository: a closed
/// channel cannot be reopened.
///
/// Closing a queue is dropping its last sender. The coordinator owns `fetch_tx` and one
/// `index_tx`; each fetch worker holds its own `index_tx` clone, so the index queue only
/// closes once the coordinator drops its sender and every fetch worker has exited.
pub struct SyncChannels {
    pub fetch_tx: Sender<Issue>,
    pub fetch_rx: Receiver<Issue>,
    pub index_tx: Sender<IndexedItem>,
    pub index_rx: Receiver<IndexedItem>,
}

/// Bounded queues: enrichment capacity = fetch pool size, persistence capacity = index pool size.
pub fn create_sync_channels(options: &SyncOptions) -> SyncChannels {
    let (fetch_tx, fetch_rx) = bounded::<Issue>(options.num_fetch_procs);
    let (index_tx, index_rx) = bounded::<IndexedItem>(options.num_index_procs);
    SyncChannels {
        fetch_tx,
        fetch_rx,
        index_tx,
        index_rx,
    }
}
