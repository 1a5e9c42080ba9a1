use std::{io, result::Result as StdResult};

use thiserror::Error;
use tokio::task::JoinError;

/// Convenient result type for the builder crate.
pub type Result<T> = StdResult<T, Error>;

/// Failures of the builder's collaborators (storage, notices, background tasks).
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure while reading or writing a stored section.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored section could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No section is stored under the requested id.
    #[error("Section not found: {0}")]
    NotFound(String),

    /// A section id contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid section id '{0}': use letters, digits, '-' or '_'")]
    InvalidSectionId(String),

    /// A background load or save task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Join(#[from] JoinError),

    /// The notice channel has been closed by the receiver.
    #[error("Notice channel closed")]
    ChannelClosed,
}
