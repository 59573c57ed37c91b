//! Error types for TetGen file loading.

use tetwalk_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur while loading a TetGen mesh.
#[derive(Error, Debug)]
pub enum TetgenError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed or referenced something out of range.
    #[error("{file}:{line}: {message}")]
    Malformed {
        /// File name (or extension when parsing from memory).
        file: String,
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// A required file does not exist.
    #[error("missing mesh file: {0}")]
    Missing(String),

    /// The files parsed but do not describe a valid mesh.
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),
}

impl TetgenError {
    /// Create a malformed-input error.
    pub fn malformed(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Prefix the file name of a [`TetgenError::Malformed`] error, turning
    /// an extension such as `.node` into a full path.
    pub(crate) fn with_prefix(self, prefix: &str) -> Self {
        match self {
            Self::Malformed {
                file,
                line,
                message,
            } => Self::Malformed {
                file: format!("{prefix}{file}"),
                line,
                message,
            },
            other => other,
        }
    }
}

/// Result type for TetGen loading.
pub type Result<T> = std::result::Result<T, TetgenError>;
