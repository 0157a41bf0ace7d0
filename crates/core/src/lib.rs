//! Core types for memxamine
//!
//! This crate defines the foundational pieces shared by the engine and CLI:
//! - DiffFileDescriptor: a parsed memdiff file name
//! - SegmentSnapshotStat: per-cell byte size and set-bit count
//! - Extents: matrix bounds derived from discovered files
//! - Naming: the `pid<PID>_snap<A>_snap<B>_seg<SEG>.memdiff` convention
//! - Population count over byte buffers
//! - Error: fatal I/O error hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod naming;
pub mod popcount;
pub mod types;

pub use error::{Error, IoOperation, Result};
pub use naming::{diff_file_name, parse_diff_file_name, pid_prefix, DIFF_FILE_EXTENSION};
pub use popcount::{count_set_bits, count_set_bits_bytewise};
pub use types::{DiffFileDescriptor, Extents, SegmentSnapshotStat};
