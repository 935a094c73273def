//! Timer Deck - A state-managed HTTP server for countdown timers
//!
//! Timers are grouped by category, tick down in background tasks, raise a
//! one-time halfway alert, and leave a history entry when they complete.
//! State is mirrored to a JSON key/value store after every change.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use tasks::BackgroundTasks;
pub use utils::signals::shutdown_signal;
