//! End-to-end scenarios through the public facade
//!
//! Each scenario lays out a memdiff directory, runs the analyzer and checks
//! extents, matrix contents and the rendered report.

use std::fs;

use memxamine::{
    AnalysisConfig, Analyzer, DisplayPolicy, Extents, OutputMode, SegmentSnapshotStat,
};
use tempfile::tempdir;

#[test]
fn test_two_transitions_one_segment() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("pid100_snap1_snap2_seg0.memdiff"), [0xFFu8; 4]).unwrap();
    fs::write(dir.path().join("pid100_snap2_snap3_seg0.memdiff"), [0x00u8; 4]).unwrap();

    let analysis = Analyzer::new(AnalysisConfig::for_pid(100).with_source_dir(dir.path()))
        .run()
        .unwrap();

    assert_eq!(analysis.catalog.extents(), Extents::new(1, 2));
    assert_eq!(analysis.matrix.get(0, 0), Some(&SegmentSnapshotStat::new(4, 32)));
    assert_eq!(analysis.matrix.get(0, 1), Some(&SegmentSnapshotStat::new(4, 0)));

    let rows = &analysis.report.rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].segment, 0);
    assert_eq!(rows[0].total, SegmentSnapshotStat::new(8, 32));

    let table = analysis.report.render_table();
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Changed snap 1 to snap 2"));
    assert!(lines[0].contains("Changed snap 2 to snap 3"));
    assert!(lines[1].contains("32/64 (50.00%)"));
    assert!(lines[1].contains("32/32 (100.00%)"));
    assert!(lines[1].ends_with("0/32 (0.00%)"));

    assert_eq!(
        analysis.progress_line(),
        "Reading 2 files for pid 100 over 3 snapshots on memory regions 0 through 0"
    );
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();

    let analysis = Analyzer::new(AnalysisConfig::for_pid(7).with_source_dir(dir.path()))
        .run()
        .unwrap();

    assert!(analysis.catalog.is_empty());
    assert_eq!(analysis.catalog.extents(), Extents::new(0, 0));
    assert!(analysis.report.rows.is_empty());
    assert_eq!(analysis.report.render_table().lines().count(), 1);
}

#[test]
fn test_unchanged_segment_visibility() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("pid5_snap1_snap2_seg0.memdiff"), [0u8; 8]).unwrap();
    fs::write(dir.path().join("pid5_snap2_snap3_seg0.memdiff"), [0u8; 8]).unwrap();
    fs::write(dir.path().join("pid5_snap1_snap2_seg1.memdiff"), [1u8; 8]).unwrap();

    let config = AnalysisConfig::for_pid(5).with_source_dir(dir.path());

    let hidden = Analyzer::new(config.clone()).run().unwrap();
    assert_eq!(hidden.report.rows.len(), 1);
    assert_eq!(hidden.report.rows[0].segment, 1);

    let shown = Analyzer::new(config.with_display(DisplayPolicy::show_unchanged()))
        .run()
        .unwrap();
    assert_eq!(shown.report.rows.len(), 2);
    let unchanged_line = shown.report.render_table().lines().nth(1).unwrap().to_string();
    assert_eq!(unchanged_line.matches("(0.00%)").count(), 3);
}

#[test]
fn test_json_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("pid9_snap1_snap2_seg2.memdiff"), [0x0Fu8]).unwrap();

    let analysis = Analyzer::new(AnalysisConfig::for_pid(9).with_source_dir(dir.path()))
        .run()
        .unwrap();
    let json = analysis.report.render(OutputMode::Json);
    assert!(json.contains("\"segment\": 2"));
    assert!(json.contains("\"set_bit_count\": 4"));
}
