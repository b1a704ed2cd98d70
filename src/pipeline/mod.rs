//! Sync pipeline: page lister → classifier → {index queue | fetch queue → fetch workers → index queue} → index workers → store.

pub mod context;
pub mod fetch;
pub mod lister;
pub mod orchestrator;
pub mod persist;
pub mod report;

pub use context::{SyncChannels, WorkerContext, create_sync_channels};
pub use fetch::{enrich_pull_request, spawn_fetch_workers};
pub use lister::{ListedPage, PageLister, first_page};
pub use orchestrator::{SyncJob, SyncPhase, route_issue};
pub use persist::{persist_item, spawn_index_workers};
pub use report::{SyncCounters, SyncReport, log_sync_report};
