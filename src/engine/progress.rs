//! Progress counter for stored items

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: impl Into<String>, unit: &'static str) -> Arc<Mutex<Bar>> {
    let bar = Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc.into(),
        animation = Animation::Classic,
        position = 0,
        unit = unit
    )));
    refresh_bar(&bar);
    bar
}

/// Force a refresh of the bar (e.g. so counter shows "0 items" immediately).
pub fn refresh_bar(pb: &Arc<Mutex<Bar>>) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Add `n` to the counter.
pub fn update_progress_bar(pb: &Arc<Mutex<Bar>>, n: usize) {
    if let Ok(mut pb) = pb.lock() {
        let _ = pb.update(n);
    }
}

/// Final refresh once all workers are done, then move past the bar's line.
pub fn finish_bar(pb: &Arc<Mutex<Bar>>) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.refresh();
        eprintln!();
    }
}
