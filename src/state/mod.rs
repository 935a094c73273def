//! State management module
//!
//! Timer and history model, the reducer that transitions it, and the
//! application state container that owns it.

pub mod app_state;
pub mod history;
pub mod preferences;
pub mod reducer;
pub mod timer;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use app_state::{AppState, Settings, StateChange};
pub use history::HistoryEntry;
pub use preferences::Preferences;
pub use reducer::{reduce, Action, AppData, BulkKind};
pub use timer::{NewTimer, Timer, TimerId, TimerStatus, TimerUpdate};

/// Lock `mutex`, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
