//! Error types shared across the crate

use thiserror::Error;

/// Failures of the key/value store backing persistence
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections of the add-timer form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all fields.")]
    MissingField(&'static str),

    #[error("Duration must be a positive number of seconds, got '{0}'")]
    InvalidDuration(String),
}

/// Failure of a platform notification side effect
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to run notifier '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Notifier '{program}' exited with failure: {stderr}")]
    Failed { program: String, stderr: String },
}
