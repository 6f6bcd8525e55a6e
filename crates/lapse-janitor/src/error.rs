//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
///
/// Store failures inside a sweep are logged and swallowed; they only surface
/// as `Store` from the lower-level [`Janitor::find_expired`](crate::Janitor::find_expired).
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The scheduler has already left the uninitialized state
    #[error("Janitor worker already started")]
    AlreadyStarted,

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
