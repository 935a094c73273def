//! Background writer mirroring the timer state to the store

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    state::AppState,
    storage::{save, STATE_KEY},
};

/// Save every published snapshot. Rapid changes coalesce: only the latest
/// snapshot is written once the previous write finishes.
pub async fn persistence_task(state: Arc<AppState>) {
    info!("Starting persistence writer");

    let mut snapshots = state.subscribe_snapshots();
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        match save(state.store(), STATE_KEY, &snapshot).await {
            Ok(()) => debug!(
                "Persisted {} timers and {} history entries",
                snapshot.timers.len(),
                snapshot.history.len()
            ),
            Err(e) => warn!("Failed to persist timer state: {}", e),
        }
    }

    info!("Snapshot channel closed, stopping persistence writer");
}
