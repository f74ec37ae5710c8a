//! Error types for tablestore.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in tablestore.
///
/// Every failure aborts the current operation and surfaces here; nothing is
/// retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing file or its directory could not be created or written
    /// during construction.
    #[error("cannot initialize table storage at {path:?}: {source}")]
    StorageInit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reopen target does not exist.
    #[error("table '{name}' not found at {path:?}")]
    TableNotFound { name: String, path: PathBuf },

    /// Read or write failure while an operation was running.
    #[error("I/O error on {path:?}: {source}")]
    StorageIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A row's value count does not equal `degree - 1`.
    #[error("expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A persisted line could not be parsed. Treated as corruption.
    ///
    /// `line` is the zero-based line index in the backing file.
    #[error("corrupt line {line}: {reason}")]
    Decode { line: usize, reason: String },

    /// The column list cannot be stored as a header line.
    #[error("invalid columns: {0}")]
    InvalidColumns(String),

    /// The storage variant does not implement this operation yet.
    #[error("{variant} table does not implement {operation}")]
    Unimplemented {
        variant: &'static str,
        operation: &'static str,
    },
}

impl Error {
    /// Wrap an I/O error raised while an operation was running.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::StorageIo {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error raised while constructing a table.
    pub(crate) fn init(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::StorageInit {
            path: path.into(),
            source,
        }
    }

    /// Reclassify an operation I/O failure as a construction failure.
    pub(crate) fn into_init(self) -> Self {
        match self {
            Error::StorageIo { path, source } => Error::StorageInit { path, source },
            other => other,
        }
    }
}
