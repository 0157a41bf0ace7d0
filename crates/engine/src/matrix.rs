//! Segment x transition statistics matrix
//!
//! The matrix is allocated once from finalized [`Extents`] and filled by one
//! pass over every cell in `(segment, transition)` order. Each cell looks up
//! its diff file by `(segment, from_snapshot)` instead of walking the sorted
//! file list, so a missing file or a naming collision cannot shift later
//! files into the wrong cell.
//!
//! Files are read through a [`DiffFileSource`]; [`MmapFileSource`] maps each
//! file read-only and counts its set bits.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use rustc_hash::FxHashMap;

use memxamine_core::{
    count_set_bits, diff_file_name, DiffFileDescriptor, Error, Extents, IoOperation, Result,
    SegmentSnapshotStat,
};

use crate::catalog::Catalog;

/// Produces the statistics of one diff file
pub trait DiffFileSource {
    /// Read the file at `path` and return its byte size and set-bit count
    ///
    /// # Errors
    /// Any failure is fatal to the whole matrix build.
    fn read_stat(&mut self, path: &Path) -> Result<SegmentSnapshotStat>;
}

/// Reads diff files through a read-only memory map
///
/// The file handle and the mapping live only for the duration of one
/// `read_stat` call and are released on every return path.
#[derive(Debug, Default, Clone, Copy)]
pub struct MmapFileSource;

impl DiffFileSource for MmapFileSource {
    fn read_stat(&mut self, path: &Path) -> Result<SegmentSnapshotStat> {
        let file = File::open(path).map_err(|e| Error::io(IoOperation::Open, path, e))?;
        let byte_size = file
            .metadata()
            .map_err(|e| Error::io(IoOperation::Stat, path, e))?
            .len();

        // Zero-length regions cannot be mapped.
        if byte_size == 0 {
            return Ok(SegmentSnapshotStat::default());
        }

        // SAFETY: the mapping is read-only and dropped before this function
        // returns; the capture tool does not rewrite diff files in place.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::io(IoOperation::Map, path, e))?;
        let set_bit_count = count_set_bits(&map);

        Ok(SegmentSnapshotStat::new(byte_size, set_bit_count))
    }
}

/// Largest matrix [`DiffMatrix::allocate`] will reserve, in cells
pub const MAX_CELLS: usize = 1 << 28;

/// Rectangular `[segment][transition]` grid of cell statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffMatrix {
    extents: Extents,
    rows: usize,
    columns: usize,
    cells: Vec<SegmentSnapshotStat>,
}

impl DiffMatrix {
    /// Allocate a zeroed matrix covering `extents`
    ///
    /// # Errors
    /// Returns `Error::Allocation` if the cell count overflows, exceeds
    /// [`MAX_CELLS`], or the memory cannot be reserved.
    pub fn allocate(extents: Extents) -> Result<Self> {
        let allocation_error = || Error::Allocation {
            rows: usize::try_from(extents.max_segment).unwrap_or(usize::MAX),
            columns: usize::try_from(extents.max_snapshot).unwrap_or(usize::MAX),
        };
        let rows = usize::try_from(extents.max_segment).map_err(|_| allocation_error())?;
        let columns = usize::try_from(extents.max_snapshot).map_err(|_| allocation_error())?;
        let len = extents
            .cell_count()
            .filter(|&len| len <= MAX_CELLS)
            .ok_or_else(allocation_error)?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| allocation_error())?;
        cells.resize(len, SegmentSnapshotStat::default());

        Ok(DiffMatrix {
            extents,
            rows,
            columns,
            cells,
        })
    }

    /// Bounds the matrix was allocated with
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Number of segment rows
    pub fn segment_count(&self) -> usize {
        self.rows
    }

    /// Number of transition columns
    pub fn transition_count(&self) -> usize {
        self.columns
    }

    /// Cell for `segment` and zero-based `transition`
    pub fn get(&self, segment: usize, transition: usize) -> Option<&SegmentSnapshotStat> {
        if segment >= self.rows || transition >= self.columns {
            return None;
        }
        self.cells.get(segment * self.columns + transition)
    }

    /// All transition cells of one segment
    pub fn row(&self, segment: usize) -> &[SegmentSnapshotStat] {
        if segment >= self.rows {
            return &[];
        }
        let start = segment * self.columns;
        &self.cells[start..start + self.columns]
    }

    /// Rows in segment order
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[SegmentSnapshotStat])> + '_ {
        (0..self.rows).map(move |segment| (segment, self.row(segment)))
    }

    /// Number of cells holding data
    pub fn populated_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    fn set(&mut self, segment: usize, transition: usize, stat: SegmentSnapshotStat) {
        let index = segment * self.columns + transition;
        self.cells[index] = stat;
    }
}

/// Build the matrix for a scanned catalog with memory-mapped reads
pub fn build_matrix(catalog: &Catalog) -> Result<DiffMatrix> {
    build_matrix_with(
        catalog.dir(),
        catalog.pid(),
        catalog.extents(),
        catalog.descriptors(),
        &mut MmapFileSource,
    )
}

/// Build the matrix reading each matched file through `source`
///
/// The first failing read aborts the build; no partial matrix is returned.
pub fn build_matrix_with<S: DiffFileSource>(
    dir: &Path,
    pid: u32,
    extents: Extents,
    descriptors: &[DiffFileDescriptor],
    source: &mut S,
) -> Result<DiffMatrix> {
    let index = index_descriptors(descriptors);
    let mut matrix = DiffMatrix::allocate(extents)?;
    let mut files_read = 0usize;

    for segment in 0..matrix.segment_count() {
        for transition in 0..matrix.transition_count() {
            let from_snapshot = transition as u64 + 1;
            if !index.contains_key(&(segment as u64, from_snapshot)) {
                continue;
            }

            let path = dir.join(diff_file_name(pid, from_snapshot, segment as u64));
            let stat = source.read_stat(&path)?;
            tracing::debug!(
                path = %path.display(),
                bytes = stat.byte_size,
                set_bits = stat.set_bit_count,
                "Read memdiff file"
            );
            matrix.set(segment, transition, stat);
            files_read += 1;
        }
    }

    tracing::info!(
        files = files_read,
        segments = matrix.segment_count(),
        transitions = matrix.transition_count(),
        "Built diff matrix"
    );
    Ok(matrix)
}

/// Key descriptors by `(segment, from_snapshot)`; the first of a colliding
/// pair wins
fn index_descriptors(
    descriptors: &[DiffFileDescriptor],
) -> FxHashMap<(u64, u64), &DiffFileDescriptor> {
    let mut index: FxHashMap<(u64, u64), &DiffFileDescriptor> = FxHashMap::default();
    index.reserve(descriptors.len());
    for descriptor in descriptors {
        if let Some(existing) = index.get(&descriptor.key()) {
            tracing::warn!(
                kept = existing.file_name(),
                ignored = descriptor.file_name(),
                "Duplicate memdiff cell"
            );
            continue;
        }
        index.insert(descriptor.key(), descriptor);
    }
    index
}
