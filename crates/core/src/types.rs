//! Core types for memxamine
//!
//! This module defines the foundational types:
//! - DiffFileDescriptor: identity of one memdiff file
//! - SegmentSnapshotStat: what one matrix cell records
//! - Extents: the bounds of the segment x transition matrix

use serde::{Deserialize, Serialize};
use std::fmt;

/// A memdiff file that passed discovery
///
/// Identifies the diff between snapshot `from_snapshot` and
/// `from_snapshot + 1` of memory segment `segment` for process `pid`.
/// Descriptors are produced by the naming parser and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DiffFileDescriptor {
    pid: u32,
    from_snapshot: u64,
    segment: u64,
    file_name: String,
}

impl DiffFileDescriptor {
    pub(crate) fn new(pid: u32, from_snapshot: u64, segment: u64, file_name: String) -> Self {
        DiffFileDescriptor {
            pid,
            from_snapshot,
            segment,
            file_name,
        }
    }

    /// Process id the diff was captured from
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// First snapshot of the consecutive pair
    pub fn from_snapshot(&self) -> u64 {
        self.from_snapshot
    }

    /// Second snapshot of the consecutive pair
    pub fn to_snapshot(&self) -> u64 {
        self.from_snapshot + 1
    }

    /// Zero-based memory segment index
    pub fn segment(&self) -> u64 {
        self.segment
    }

    /// File name as found on disk
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Matrix key: `(segment, from_snapshot)`
    pub fn key(&self) -> (u64, u64) {
        (self.segment, self.from_snapshot)
    }
}

impl fmt::Display for DiffFileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name)
    }
}

/// Statistics for one (segment, transition) cell
///
/// The zero value means "no file / no data for this cell".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSnapshotStat {
    /// Size of the diff file in bytes
    pub byte_size: u64,
    /// Number of bits set to 1 in the diff file
    pub set_bit_count: u64,
}

impl SegmentSnapshotStat {
    /// Create a cell from its byte size and set-bit count
    pub fn new(byte_size: u64, set_bit_count: u64) -> Self {
        SegmentSnapshotStat {
            byte_size,
            set_bit_count,
        }
    }

    /// True when no data was recorded for the cell
    pub fn is_empty(&self) -> bool {
        self.byte_size == 0
    }

    /// Total number of bits covered by the cell
    pub fn total_bits(&self) -> u64 {
        self.byte_size.saturating_mul(8)
    }

    /// Share of bits set, in percent; 0.0 for an empty cell
    pub fn percent_changed(&self) -> f64 {
        let bits = self.total_bits();
        if bits == 0 {
            return 0.0;
        }
        self.set_bit_count as f64 * 100.0 / bits as f64
    }

    /// Add another cell into this one (row totals)
    pub fn accumulate(&mut self, other: &SegmentSnapshotStat) {
        self.byte_size = self.byte_size.saturating_add(other.byte_size);
        self.set_bit_count = self.set_bit_count.saturating_add(other.set_bit_count);
    }
}

/// Bounds of the statistics matrix
///
/// `max_segment` is one past the largest segment index seen and
/// `max_snapshot` is the number of snapshot transitions, i.e. the largest
/// "to" snapshot minus one. No discoveries gives `Extents::default()`,
/// both zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extents {
    /// Number of segment rows
    pub max_segment: u64,
    /// Number of transition columns
    pub max_snapshot: u64,
}

impl Extents {
    /// Create extents from explicit bounds
    pub fn new(max_segment: u64, max_snapshot: u64) -> Self {
        Extents {
            max_segment,
            max_snapshot,
        }
    }

    /// Grow the extents so that `descriptor` falls inside them
    pub fn include(&mut self, descriptor: &DiffFileDescriptor) {
        self.max_segment = self.max_segment.max(descriptor.segment().saturating_add(1));
        // Transitions end at `to_snapshot - 1`, which is the `from` snapshot.
        self.max_snapshot = self.max_snapshot.max(descriptor.from_snapshot());
    }

    /// True when the matrix would have no cells
    pub fn is_empty(&self) -> bool {
        self.max_segment == 0 || self.max_snapshot == 0
    }

    /// Number of cells in the matrix, if it fits in memory indexing
    pub fn cell_count(&self) -> Option<usize> {
        let rows = usize::try_from(self.max_segment).ok()?;
        let cols = usize::try_from(self.max_snapshot).ok()?;
        rows.checked_mul(cols)
    }
}
