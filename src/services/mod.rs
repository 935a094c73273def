//! External side-effect collaborators
//!
//! Notifications are the only platform effect the timers raise.

pub mod notifier;

pub use notifier::{CommandNotifier, LogNotifier, Notifier};
