//! Diff aggregation and reporting engine for memxamine
//!
//! This crate turns a directory of memdiff files into a report:
//! - Catalog: discovery of one pid's memdiff files and their extents
//! - Ordering: `(segment, from_snapshot)` order with collision warnings
//! - DiffMatrix: segment x transition grid of byte sizes and set-bit counts
//! - Report: row filtering and table/JSON rendering
//! - Config: analysis configuration and source path validation
//! - Analyzer: the sequential pipeline tying them together

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyze;
pub mod catalog;
pub mod config;
pub mod matrix;
pub mod ordering;
pub mod report;

pub use analyze::{Analysis, Analyzer};
pub use catalog::{compute_extents, discover, Catalog};
pub use config::{
    validate_source_dir, AnalysisConfig, BlockSize, ConfigError, DisplayPolicy, OutputMode,
    PathError,
};
pub use matrix::{
    build_matrix, build_matrix_with, DiffFileSource, DiffMatrix, MmapFileSource, MAX_CELLS,
};
pub use ordering::{compare_descriptors, sort_descriptors};
pub use report::{format_ratio, progress_line, transition_header, Report, ReportRow};

// Re-export core types so callers need a single dependency
pub use memxamine_core::{
    count_set_bits, diff_file_name, parse_diff_file_name, DiffFileDescriptor, Error, Extents,
    IoOperation, Result, SegmentSnapshotStat,
};
