//! Report rendering
//!
//! Two modes:
//! - **Table** (default): one right-aligned column per transition, e.g.
//!   `32/64 (50.00%)`, blank where a cell has no data
//! - **JSON** (`--json`): `serde_json::to_string_pretty` of [`Report`]
//!
//! Rows are filtered by [`DisplayPolicy`] before either rendering.

use serde::Serialize;

use memxamine_core::{Extents, SegmentSnapshotStat};

use crate::config::{DisplayPolicy, OutputMode};
use crate::matrix::DiffMatrix;

/// Header of the segment index column
pub const REGION_HEADER: &str = "Region";
/// Header of the per-segment totals column
pub const TOTAL_HEADER: &str = "Total changed bits";

const COLUMN_SEPARATOR: &str = "  ";

/// Header of the column for zero-based `transition`
pub fn transition_header(transition: usize) -> String {
    format!("Changed snap {} to snap {}", transition + 1, transition + 2)
}

/// `set/bits (pp.pp%)` for one cell or row total
pub fn format_ratio(stat: &SegmentSnapshotStat) -> String {
    format!(
        "{}/{} ({:.2}%)",
        stat.set_bit_count,
        stat.total_bits(),
        stat.percent_changed()
    )
}

/// Informational line printed before the report
pub fn progress_line(file_count: usize, pid: u32, extents: Extents) -> String {
    if file_count == 0 {
        return format!("No memdiff files found for pid {}", pid);
    }
    format!(
        "Reading {} files for pid {} over {} snapshots on memory regions 0 through {}",
        file_count,
        pid,
        extents.max_snapshot + 1,
        extents.max_segment.saturating_sub(1)
    )
}

/// One reported segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Segment index
    pub segment: usize,
    /// Sum over all transitions
    pub total: SegmentSnapshotStat,
    /// Per transition; `None` where no data was recorded
    pub transitions: Vec<Option<SegmentSnapshotStat>>,
}

/// Filtered view of a diff matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Bounds of the source matrix
    pub extents: Extents,
    /// Surviving segments in ascending order
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Sum each segment row and keep the ones `policy` lets through
    pub fn build(matrix: &DiffMatrix, policy: &DisplayPolicy) -> Self {
        let extents = matrix.extents();
        let rows = matrix
            .rows()
            .filter_map(|(segment, cells)| {
                let mut total = SegmentSnapshotStat::default();
                for cell in cells {
                    total.accumulate(cell);
                }
                if !keep_row(&total, extents, policy) {
                    tracing::trace!(segment, "Segment filtered from report");
                    return None;
                }
                Some(ReportRow {
                    segment,
                    total,
                    transitions: cells
                        .iter()
                        .map(|c| (!c.is_empty()).then_some(*c))
                        .collect(),
                })
            })
            .collect();

        Report { extents, rows }
    }

    /// Number of transition columns
    pub fn transition_count(&self) -> usize {
        usize::try_from(self.extents.max_snapshot).unwrap_or(usize::MAX)
    }

    /// Render in the requested mode
    pub fn render(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Table => self.render_table(),
            OutputMode::Json => self.render_json(),
        }
    }

    /// Column-aligned plain-text table, header first
    pub fn render_table(&self) -> String {
        let mut columns: Vec<Vec<String>> = Vec::with_capacity(self.transition_count() + 2);
        columns.push(
            std::iter::once(REGION_HEADER.to_string())
                .chain(self.rows.iter().map(|r| r.segment.to_string()))
                .collect(),
        );
        columns.push(
            std::iter::once(TOTAL_HEADER.to_string())
                .chain(self.rows.iter().map(|r| format_ratio(&r.total)))
                .collect(),
        );
        for transition in 0..self.transition_count() {
            columns.push(
                std::iter::once(transition_header(transition))
                    .chain(self.rows.iter().map(|r| {
                        r.transitions
                            .get(transition)
                            .copied()
                            .flatten()
                            .map(|stat| format_ratio(&stat))
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        let widths: Vec<usize> = columns
            .iter()
            .map(|column| column.iter().map(String::len).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for line in 0..=self.rows.len() {
            for (index, (column, width)) in columns.iter().zip(&widths).enumerate() {
                if index > 0 {
                    out.push_str(COLUMN_SEPARATOR);
                }
                out.push_str(&format!("{:>width$}", column[line], width = *width));
            }
            out.push('\n');
        }
        out
    }

    /// Pretty-printed JSON document
    pub fn render_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

fn keep_row(total: &SegmentSnapshotStat, extents: Extents, policy: &DisplayPolicy) -> bool {
    if total.byte_size == 0 {
        return false;
    }
    if total.set_bit_count == 0 && !policy.show_unchanged {
        return false;
    }
    if let Some(block_size) = policy.min_average_block_size {
        let average = total
            .byte_size
            .checked_div(extents.max_snapshot)
            .unwrap_or(0);
        if average < block_size.bytes() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockSize;
    use crate::matrix::{build_matrix_with, DiffFileSource};
    use memxamine_core::{diff_file_name, parse_diff_file_name, Result};
    use std::collections::HashMap;
    use std::path::Path;

    struct CannedSource(HashMap<String, SegmentSnapshotStat>);

    impl DiffFileSource for CannedSource {
        fn read_stat(&mut self, path: &Path) -> Result<SegmentSnapshotStat> {
            let name = path.file_name().unwrap().to_str().unwrap();
            Ok(self.0.get(name).copied().unwrap_or_default())
        }
    }

    /// Matrix for pid 1 from `(from_snapshot, segment, stat)` triples
    fn matrix(cells: &[(u64, u64, SegmentSnapshotStat)]) -> DiffMatrix {
        let descriptors: Vec<_> = cells
            .iter()
            .map(|&(from, seg, _)| parse_diff_file_name(&diff_file_name(1, from, seg)).unwrap())
            .collect();
        let extents = crate::catalog::compute_extents(&descriptors);
        let mut source = CannedSource(
            cells
                .iter()
                .map(|&(from, seg, stat)| (diff_file_name(1, from, seg), stat))
                .collect(),
        );
        build_matrix_with(Path::new("."), 1, extents, &descriptors, &mut source).unwrap()
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(&SegmentSnapshotStat::new(8, 32)), "32/64 (50.00%)");
        assert_eq!(format_ratio(&SegmentSnapshotStat::new(4, 0)), "0/32 (0.00%)");
        assert_eq!(format_ratio(&SegmentSnapshotStat::new(3, 1)), "1/24 (4.17%)");
    }

    #[test]
    fn test_transition_header() {
        assert_eq!(transition_header(0), "Changed snap 1 to snap 2");
        assert_eq!(transition_header(4), "Changed snap 5 to snap 6");
    }

    #[test]
    fn test_progress_line() {
        assert_eq!(
            progress_line(2, 100, Extents::new(1, 2)),
            "Reading 2 files for pid 100 over 3 snapshots on memory regions 0 through 0"
        );
        assert_eq!(progress_line(0, 7, Extents::default()), "No memdiff files found for pid 7");
    }

    #[test]
    fn test_rows_totals() {
        let m = matrix(&[
            (1, 0, SegmentSnapshotStat::new(4, 32)),
            (2, 0, SegmentSnapshotStat::new(4, 0)),
        ]);
        let report = Report::build(&m, &DisplayPolicy::default());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].total, SegmentSnapshotStat::new(8, 32));
        assert_eq!(
            report.rows[0].transitions,
            vec![
                Some(SegmentSnapshotStat::new(4, 32)),
                Some(SegmentSnapshotStat::new(4, 0))
            ]
        );
    }

    #[test]
    fn test_segment_without_data_is_skipped() {
        // Segment 0 has no files at all; segment 1 exists to stretch the extents
        let m = matrix(&[(1, 1, SegmentSnapshotStat::new(2, 1))]);
        let report = Report::build(&m, &DisplayPolicy::show_unchanged());
        let segments: Vec<_> = report.rows.iter().map(|r| r.segment).collect();
        assert_eq!(segments, vec![1]);
    }

    #[test]
    fn test_unchanged_segment_policy() {
        let m = matrix(&[
            (1, 0, SegmentSnapshotStat::new(4, 0)),
            (1, 1, SegmentSnapshotStat::new(4, 5)),
        ]);

        let hidden = Report::build(&m, &DisplayPolicy::default());
        assert_eq!(hidden.rows.iter().map(|r| r.segment).collect::<Vec<_>>(), vec![1]);

        let shown = Report::build(&m, &DisplayPolicy::show_unchanged());
        assert_eq!(shown.rows.iter().map(|r| r.segment).collect::<Vec<_>>(), vec![0, 1]);
        assert!(shown.render_table().contains("0/32 (0.00%)"));
    }

    #[test]
    fn test_min_average_block_size() {
        // Two transitions: segment 0 averages 2048 bytes, segment 1 averages 8192
        let m = matrix(&[
            (1, 0, SegmentSnapshotStat::new(2048, 1)),
            (2, 0, SegmentSnapshotStat::new(2048, 1)),
            (1, 1, SegmentSnapshotStat::new(8192, 1)),
            (2, 1, SegmentSnapshotStat::new(8192, 1)),
        ]);
        let policy = DisplayPolicy::with_min_block_size(BlockSize::from_kilobytes(4).unwrap());
        let report = Report::build(&m, &policy);
        assert_eq!(report.rows.iter().map(|r| r.segment).collect::<Vec<_>>(), vec![1]);

        let exact = DisplayPolicy::with_min_block_size(BlockSize::from_bytes(2048).unwrap());
        assert_eq!(Report::build(&m, &exact).rows.len(), 2);
    }

    #[test]
    fn test_render_table_layout() {
        let m = matrix(&[
            (1, 0, SegmentSnapshotStat::new(4, 32)),
            (2, 0, SegmentSnapshotStat::new(4, 0)),
        ]);
        let table = Report::build(&m, &DisplayPolicy::default()).render_table();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Region  Total changed bits  Changed snap 1 to snap 2  Changed snap 2 to snap 3"
        );
        assert_eq!(
            lines[1],
            "     0      32/64 (50.00%)           32/32 (100.00%)              0/32 (0.00%)"
        );
    }

    #[test]
    fn test_render_table_blank_cells() {
        let m = matrix(&[
            (1, 0, SegmentSnapshotStat::new(1, 8)),
            (2, 1, SegmentSnapshotStat::new(1, 4)),
        ]);
        let table = Report::build(&m, &DisplayPolicy::default()).render_table();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        // Every line has the same width
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
        assert!(lines[1].ends_with(&" ".repeat("Changed snap 2 to snap 3".len())));
        assert!(lines[2].contains("4/8 (50.00%)"));
    }

    #[test]
    fn test_wide_cells_widen_column() {
        let m = matrix(&[(1, 0, SegmentSnapshotStat::new(1 << 40, 1 << 41))]);
        let table = Report::build(&m, &DisplayPolicy::default()).render_table();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0].len(), lines[1].len());
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let m = DiffMatrix::allocate(Extents::default()).unwrap();
        let report = Report::build(&m, &DisplayPolicy::default());
        assert!(report.rows.is_empty());
        assert_eq!(report.render_table(), "Region  Total changed bits\n");
    }

    #[test]
    fn test_render_json() {
        let m = matrix(&[(1, 0, SegmentSnapshotStat::new(4, 32))]);
        let json = Report::build(&m, &DisplayPolicy::default()).render(OutputMode::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["extents"]["max_snapshot"], 1);
        assert_eq!(value["rows"][0]["segment"], 0);
        assert_eq!(value["rows"][0]["total"]["set_bit_count"], 32);
        assert_eq!(value["rows"][0]["transitions"][0]["byte_size"], 4);
    }
}
