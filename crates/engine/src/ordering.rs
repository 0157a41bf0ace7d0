//! Deterministic ordering of discovered diff files
//!
//! Descriptors sort by segment, then by first snapshot of the pair. Two
//! descriptors with the same key would fill the same matrix cell; that is a
//! naming collision and is reported as a warning, not an error.

use std::cmp::Ordering;

use memxamine_core::DiffFileDescriptor;

/// Compare two descriptors by `(segment, from_snapshot)`
///
/// Warns when both keys are equal; the relative order of such a pair is
/// unspecified.
pub fn compare_descriptors(a: &DiffFileDescriptor, b: &DiffFileDescriptor) -> Ordering {
    let ordering = a.key().cmp(&b.key());
    if ordering == Ordering::Equal {
        warn_collision(a, b);
    }
    ordering
}

/// Sort descriptors in place, returning the number of colliding pairs seen
pub fn sort_descriptors(descriptors: &mut [DiffFileDescriptor]) -> usize {
    let mut collisions = 0usize;
    descriptors.sort_by(|a, b| {
        let ordering = compare_descriptors(a, b);
        if ordering == Ordering::Equal {
            collisions += 1;
        }
        ordering
    });
    collisions
}

fn warn_collision(a: &DiffFileDescriptor, b: &DiffFileDescriptor) {
    tracing::warn!(
        first = a.file_name(),
        second = b.file_name(),
        segment = a.segment(),
        snapshot = a.from_snapshot(),
        "Memdiff files share a segment and snapshot; ordering between them is unspecified"
    );
}
