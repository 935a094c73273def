//! Background tasks module
//!
//! The countdown supervisor with its per-timer tick tasks, and the
//! persistence writer.

pub mod countdown;
pub mod persistence;
pub mod registry;
pub mod supervisor;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::state::AppState;

pub use countdown::{Countdown, Phase, TickOutcome};
pub use persistence::persistence_task;
pub use registry::CountdownRegistry;
pub use supervisor::{countdown_supervisor_task, TICK_PERIOD};

/// Handles of the long-running background tasks
#[derive(Debug)]
pub struct BackgroundTasks {
    supervisor: JoinHandle<()>,
    persistence: JoinHandle<()>,
}

impl BackgroundTasks {
    /// Start the supervisor and the persistence writer for `state`
    pub fn spawn(state: &Arc<AppState>) -> Self {
        Self {
            supervisor: tokio::spawn(countdown_supervisor_task(Arc::clone(state))),
            persistence: tokio::spawn(persistence_task(Arc::clone(state))),
        }
    }

    pub fn abort(&self) {
        self.supervisor.abort();
        self.persistence.abort();
    }
}
