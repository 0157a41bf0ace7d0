//! Error types for memxamine
//!
//! Every error in this module is fatal to an analysis run: the pipeline
//! unwinds on the first one and no partial report is produced.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for memxamine operations
pub type Result<T> = std::result::Result<T, Error>;

/// File operation that failed while reading a diff file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    /// Opening the file read-only
    Open,
    /// Querying the file size
    Stat,
    /// Mapping the file into memory
    Map,
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoOperation::Open => "open",
            IoOperation::Stat => "stat",
            IoOperation::Map => "map",
        };
        f.write_str(name)
    }
}

/// Fatal errors raised by the analysis core
#[derive(Debug, Error)]
pub enum Error {
    /// The source directory could not be listed
    #[error("unable to list {}: {source}", .path.display())]
    ListDirectory {
        /// Directory being scanned
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// A diff file could not be opened, stat'ed or mapped
    #[error("unable to {op} {}: {source}", .path.display())]
    Io {
        /// Operation that failed
        op: IoOperation,
        /// File being read
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// The statistics matrix could not be allocated
    #[error("unable to allocate a {rows}x{columns} statistics matrix")]
    Allocation {
        /// Number of segment rows requested
        rows: usize,
        /// Number of transition columns requested
        columns: usize,
    },
}

impl Error {
    /// Build an `Io` error for `op` on `path`
    pub fn io(op: IoOperation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// The underlying OS error, when there is one
    pub fn io_source(&self) -> Option<&io::Error> {
        match self {
            Error::ListDirectory { source, .. } | Error::Io { source, .. } => Some(source),
            Error::Allocation { .. } => None,
        }
    }
}
