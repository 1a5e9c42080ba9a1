//! Error handling for the pagebuild binary.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for pagebuild commands.
pub type Result<T> = result::Result<T, Error>;

/// Errors that end a pagebuild command.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading an input file or writing a bundle failed.
    #[error("I/O error on {}: {source}", path.display())]
    File {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Writing output or starting the runtime failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Storage, notice or task failure.
    #[error(transparent)]
    Builder(#[from] builder::Error),
    /// A config file is not a usable section config.
    #[error(transparent)]
    Preview(#[from] preview::Error),
    /// Flags that parse but make no sense together.
    #[error("{0}")]
    InvalidArgument(String),
}

impl Error {
    /// Attach the offending path to an I/O error.
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
