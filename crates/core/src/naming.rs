//! Memdiff file naming convention
//!
//! The capture tool writes one file per segment and consecutive snapshot
//! pair, named:
//!
//! ```text
//! pid<PID>_snap<A>_snap<B>_seg<SEG>.memdiff
//! ```
//!
//! where `B = A + 1`, snapshots are numbered from 1 and segments from 0.
//! Matching is case-sensitive and exact; numbers are plain decimal without
//! sign or leading zeros, so a parsed name always re-synthesizes to itself.
//! Every number must fit the capture tool's C `int`, at most
//! [`MAX_NAME_NUMBER`].

use crate::types::DiffFileDescriptor;

/// Extension carried by every diff file (without the dot)
pub const DIFF_FILE_EXTENSION: &str = "memdiff";

/// Largest pid, snapshot or segment number a diff file name may carry
pub const MAX_NAME_NUMBER: u64 = i32::MAX as u64;

const PID_TAG: &str = "pid";
const SNAP_TAG: &str = "snap";
const SEG_TAG: &str = "seg";

/// Literal prefix shared by every diff file of `pid`
pub fn pid_prefix(pid: u32) -> String {
    format!("{}{}_", PID_TAG, pid)
}

/// Synthesize the file name of the diff `from_snapshot -> from_snapshot + 1`
/// for `segment` of `pid`
pub fn diff_file_name(pid: u32, from_snapshot: u64, segment: u64) -> String {
    format!(
        "{}{}_{}{}_{}{}_{}{}.{}",
        PID_TAG,
        pid,
        SNAP_TAG,
        from_snapshot,
        SNAP_TAG,
        from_snapshot + 1,
        SEG_TAG,
        segment,
        DIFF_FILE_EXTENSION
    )
}

/// Parse a file name into a descriptor
///
/// Returns `None` when the name does not follow the convention in full:
/// wrong extension, missing or misspelled tag, non-decimal or non-canonical
/// number, a number above [`MAX_NAME_NUMBER`], non-consecutive snapshots,
/// or a snapshot numbered 0. A name is never partially parsed.
pub fn parse_diff_file_name(file_name: &str) -> Option<DiffFileDescriptor> {
    let stem = file_name
        .strip_suffix(DIFF_FILE_EXTENSION)?
        .strip_suffix('.')?;

    let mut tokens = stem.split('_');
    let pid = tagged_number(tokens.next()?, PID_TAG)?;
    let from_snapshot = tagged_number(tokens.next()?, SNAP_TAG)?;
    let to_snapshot = tagged_number(tokens.next()?, SNAP_TAG)?;
    let segment = tagged_number(tokens.next()?, SEG_TAG)?;
    if tokens.next().is_some() {
        return None;
    }

    if [pid, to_snapshot, segment]
        .iter()
        .any(|&number| number > MAX_NAME_NUMBER)
    {
        return None;
    }
    let pid = u32::try_from(pid).ok()?;
    if from_snapshot == 0 || from_snapshot.checked_add(1)? != to_snapshot {
        return None;
    }

    Some(DiffFileDescriptor::new(
        pid,
        from_snapshot,
        segment,
        file_name.to_string(),
    ))
}

/// `<tag><decimal>` with a canonical decimal
fn tagged_number(token: &str, tag: &str) -> Option<u64> {
    let digits = token.strip_prefix(tag)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}
