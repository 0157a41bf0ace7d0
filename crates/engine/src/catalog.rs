//! Memdiff file discovery
//!
//! Discovery runs in two explicit phases:
//! 1. [`discover`] lists the source directory and keeps the regular files
//!    whose names parse as memdiff files of the target pid.
//! 2. [`compute_extents`] reduces the resulting descriptors to the matrix
//!    bounds.
//!
//! [`Catalog::scan`] runs both phases and sorts the descriptors.

use std::fs;
use std::path::{Path, PathBuf};

use memxamine_core::{
    parse_diff_file_name, pid_prefix, DiffFileDescriptor, Error, Extents, Result,
    DIFF_FILE_EXTENSION,
};

use crate::ordering::sort_descriptors;

/// List the memdiff files of `pid` in `dir`
///
/// Entries that are not regular files, do not carry the memdiff extension,
/// belong to another pid or do not follow the naming convention are skipped
/// without error. Descriptors come back in directory order.
///
/// # Errors
/// Returns `Error::ListDirectory` if the directory or one of its entries
/// cannot be read.
pub fn discover(dir: &Path, pid: u32) -> Result<Vec<DiffFileDescriptor>> {
    let list_error = |source| Error::ListDirectory {
        path: dir.to_path_buf(),
        source,
    };
    let prefix = pid_prefix(pid);
    let mut descriptors = Vec::new();

    for entry in fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some(DIFF_FILE_EXTENSION) {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::trace!(path = %path.display(), "Skipping non UTF-8 file name");
            continue;
        };
        if !name.starts_with(&prefix) {
            continue;
        }
        if !is_regular_file(&path) {
            tracing::trace!(
                file = name,
                "Skipping memdiff entry that is not a regular file"
            );
            continue;
        }
        match parse_diff_file_name(name) {
            Some(descriptor) if descriptor.pid() == pid => descriptors.push(descriptor),
            _ => tracing::trace!(file = name, "Skipping malformed memdiff file name"),
        }
    }

    tracing::debug!(
        dir = %dir.display(),
        pid,
        count = descriptors.len(),
        "Discovered memdiff files"
    );
    Ok(descriptors)
}

/// Matrix bounds covering every descriptor
///
/// An empty slice yields `Extents::default()`, both bounds zero.
pub fn compute_extents(descriptors: &[DiffFileDescriptor]) -> Extents {
    descriptors
        .iter()
        .fold(Extents::default(), |mut extents, descriptor| {
            extents.include(descriptor);
            extents
        })
}

/// Follows symlinks; anything that cannot be stat'ed is not a regular file
fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Sorted memdiff files of one pid and the extents they span
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    pid: u32,
    descriptors: Vec<DiffFileDescriptor>,
    extents: Extents,
    collisions: usize,
}

impl Catalog {
    /// Discover, measure and sort the memdiff files of `pid` in `dir`
    ///
    /// Extents are final before this returns; nothing downstream may grow
    /// them.
    pub fn scan(dir: impl AsRef<Path>, pid: u32) -> Result<Self> {
        let dir = dir.as_ref();
        let mut descriptors = discover(dir, pid)?;
        let extents = compute_extents(&descriptors);
        let collisions = sort_descriptors(&mut descriptors);

        Ok(Catalog {
            dir: dir.to_path_buf(),
            pid,
            descriptors,
            extents,
            collisions,
        })
    }

    /// Source directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target pid
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Descriptors sorted by `(segment, from_snapshot)`
    pub fn descriptors(&self) -> &[DiffFileDescriptor] {
        &self.descriptors
    }

    /// Matrix bounds
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Number of discovered files
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True when no file matched
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Number of naming collisions seen while sorting
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}
