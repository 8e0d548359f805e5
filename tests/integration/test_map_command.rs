//! Integration tests for the map command.

use std::path::Path;

use noodles::sam::alignment::record::cigar::op::{Kind, Op};
use tempfile::TempDir;

use crate::helpers::{
    EXAMPLE_GROUPED, assert_success, example_sam, read_lines, run_mpramap, sam_header, sam_line,
    write_bam, write_file,
};

fn run_stages(dir: &Path, input: &Path) -> Vec<String> {
    let scored = dir.join("scored.tsv");
    let grouped = dir.join("grouped.tsv");
    let resolved = dir.join("resolved.tsv");
    let stages = [
        ("score", input, scored.as_path()),
        ("group", scored.as_path(), grouped.as_path()),
        ("resolve", grouped.as_path(), resolved.as_path()),
    ];
    for (command, from, to) in stages {
        let result =
            run_mpramap(&[command, "-i", from.to_str().unwrap(), "-o", to.to_str().unwrap()]);
        assert_success(&result);
    }
    read_lines(&resolved)
}

#[test]
fn test_map_example() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "aligned.sam", &example_sam());
    let output = temp_dir.path().join("resolved.tsv");
    let score_metrics = temp_dir.path().join("score_metrics.txt");
    let group_metrics = temp_dir.path().join("group_metrics.txt");
    let metrics = temp_dir.path().join("metrics.txt");

    let result = run_mpramap(&[
        "map",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--score-metrics",
        score_metrics.to_str().unwrap(),
        "--group-metrics",
        group_metrics.to_str().unwrap(),
        "--metrics",
        metrics.to_str().unwrap(),
    ]);
    assert_success(&result);

    assert_eq!(read_lines(&output), vec![EXAMPLE_GROUPED]);
    assert_eq!(read_lines(&score_metrics)[1], "2\t0\t0\t2\t1\t1\t0");
    assert_eq!(read_lines(&group_metrics)[1], "2\t0\t1\t1\t0\t0");
    assert_eq!(read_lines(&metrics)[1], "1\t0\t0\t1\t0\t0");
}

#[test]
fn test_map_matches_chained_stages() {
    let temp_dir = TempDir::new().unwrap();
    let mut sam = sam_header(&["tile_1", "tile_2", "tile_3"]);
    for _ in 0..20 {
        sam.push_str(&sam_line("AAAA#tile_1", 0, "tile_1", "50M", ":50"));
    }
    sam.push_str(&sam_line("AAAA#tile_2", 0, "tile_2", "48M2S", ":48"));
    for _ in 0..3 {
        sam.push_str(&sam_line("CCCC#tile_2", 16, "tile_2", "50M", ":20*ag:29"));
    }
    for _ in 0..4 {
        sam.push_str(&sam_line("GGGG#tile_3", 0, "tile_3", "50M", ":50"));
        sam.push_str(&sam_line("GGGG#tile_1", 0, "tile_1", "50M", ":50"));
    }
    let input = write_file(temp_dir.path(), "aligned.sam", &sam);
    let mapped = temp_dir.path().join("mapped.tsv");

    let result =
        run_mpramap(&["map", "-i", input.to_str().unwrap(), "-o", mapped.to_str().unwrap()]);
    assert_success(&result);

    let staged_dir = temp_dir.path().join("staged");
    std::fs::create_dir(&staged_dir).unwrap();
    let staged = run_stages(&staged_dir, &input);
    let mapped = read_lines(&mapped);
    assert_eq!(mapped, staged);
    assert_eq!(mapped.len(), 3);
    assert!(mapped[0].starts_with("AAAA\ttile_1\t20\t21\t0\t"));
    assert!(mapped[1].starts_with("CCCC\ttile_RC_2\t3\t3\t0\t"));
    assert!(mapped[2].starts_with("GGGG\ttile_3,tile_1\t4,4\t8\t1\t"));
}

#[test]
fn test_map_bam_with_assignments() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("aligned.bam");
    let full = || vec![Op::new(Kind::Match, 50)];
    write_bam(
        &input,
        &["OLIGOA", "OLIGOB"],
        &[
            ("BC1#OLIGOA", 0, 0, full(), Some(":50")),
            ("BC1#OLIGOA", 0, 0, full(), Some(":50")),
            ("BC2#OLIGOB", 0, 1, full(), Some(":10*ct:39")),
        ],
    );
    let output = temp_dir.path().join("resolved.tsv");
    let assignments = temp_dir.path().join("assignments.tsv");

    let result = run_mpramap(&[
        "map",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-a",
        assignments.to_str().unwrap(),
        "--assignment-columns",
        "scored",
    ]);
    assert_success(&result);

    assert_eq!(read_lines(&output).len(), 2);
    assert_eq!(
        read_lines(&assignments),
        vec!["Barcode\tOligo\tError\tCoverage", "BC1\tOLIGOA\t0.000\t2", "BC2\tOLIGOB\t0.020\t1"]
    );
}
