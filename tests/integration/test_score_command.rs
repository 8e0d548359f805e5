//! Integration tests for the score command.

use std::io::Write;
use std::process::{Command, Stdio};

use noodles::sam::alignment::record::cigar::op::{Kind, Op};
use tempfile::TempDir;

use crate::helpers::{
    EXAMPLE_SCORED_A, EXAMPLE_SCORED_B, assert_success, example_sam, read_lines, run_mpramap,
    sam_header, sam_line, write_bam, write_file,
};

#[test]
fn test_score_example_sam() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "aligned.sam", &example_sam());
    let output = temp_dir.path().join("scored.tsv");
    let metrics = temp_dir.path().join("metrics.txt");

    let result = run_mpramap(&[
        "score",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--metrics",
        metrics.to_str().unwrap(),
    ]);
    assert_success(&result);

    assert_eq!(read_lines(&output), vec![EXAMPLE_SCORED_A, EXAMPLE_SCORED_B]);
    assert_eq!(
        read_lines(&metrics),
        vec![
            "records_read\tstrand_filtered\tmalformed_lines\trecords_scored\tpass\tfail\t\
             undefined_scores",
            "2\t0\t0\t2\t1\t1\t0",
        ]
    );
}

#[test]
fn test_score_stdin_to_stdout() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mpramap"))
        .args(["score", "-i", "-", "-o", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(example_sam().as_bytes()).unwrap();
    let result = child.wait_with_output().unwrap();
    assert_success(&result);

    let stdout = String::from_utf8(result.stdout).unwrap();
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec![EXAMPLE_SCORED_A, EXAMPLE_SCORED_B]);
}

#[test]
fn test_score_skips_short_lines_and_scores_reverse_strand() {
    let temp_dir = TempDir::new().unwrap();
    let mut sam = sam_header(&["tile_1"]);
    sam.push_str(&sam_line("BC1#tile_1", 16, "tile_1", "50M", ":50"));
    sam.push_str("truncated\tline\n");
    sam.push_str(&sam_line("BC2#tile_1", 0, "unknown", "50M", ":50"));
    let input = write_file(temp_dir.path(), "aligned.sam", &sam);
    let output = temp_dir.path().join("scored.tsv");

    let result =
        run_mpramap(&["score", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_success(&result);

    let lines = read_lines(&output);
    assert_eq!(
        lines,
        vec![
            "BC1\ttile_1\t0\ttile_RC_1\ttile_1\t60\t50\t50M\t0.000\tACGT\tPASS\t0.000\t:50\t0:50",
            "BC2\ttile_1\t1\tunknown\tunknown\t60\t0\t50M\t-\tACGT\tFAIL\t-\t:50\t0:50",
        ]
    );
}

#[test]
fn test_score_forward_only() {
    let temp_dir = TempDir::new().unwrap();
    let mut sam = sam_header(&["OLIGOA"]);
    sam.push_str(&sam_line("BC1#OLIGOA", 16, "OLIGOA", "50M", ":50"));
    sam.push_str(&sam_line("BC2#OLIGOA", 0, "OLIGOA", "50M", ":50"));
    let input = write_file(temp_dir.path(), "aligned.sam", &sam);
    let output = temp_dir.path().join("scored.tsv");

    let result = run_mpramap(&[
        "score",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--forward-only",
    ]);
    assert_success(&result);

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("BC2\t"));
}

#[test]
fn test_score_bam_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("aligned.bam");
    write_bam(
        &input,
        &["OLIGOA", "OLIGOB"],
        &[
            (
                "BC1#OLIGOB",
                0,
                1,
                vec![Op::new(Kind::Match, 40), Op::new(Kind::SoftClip, 10)],
                Some(":40"),
            ),
            ("BC2#OLIGOA", 16, 0, vec![Op::new(Kind::Match, 50)], None),
        ],
    );
    let output = temp_dir.path().join("scored.tsv");

    let result =
        run_mpramap(&["score", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_success(&result);

    let a50 = "A".repeat(50);
    let t50 = "T".repeat(50);
    assert_eq!(
        read_lines(&output),
        vec![
            format!(
                "BC1\tOLIGOB\t1\tOLIGOB\tOLIGOB\t60\t50\t40M10S\t0.400\t{a50}\t\
                 FAIL\t0.200\t:40\t0:40"
            ),
            format!(
                "BC2\tOLIGOA\t0\tOLIGOA_RC_\tOLIGOA\t60\t50\t50M\t0.000\t{t50}\t\
                 PASS\t0.000\t*\t0:50"
            ),
        ]
    );
}

#[test]
fn test_score_cigar_mode() {
    let temp_dir = TempDir::new().unwrap();
    let mut sam = sam_header(&["OLIGOA"]);
    sam.push_str(&sam_line("BC1#OLIGOA", 0, "OLIGOA", "20=1X29=", ":20*ag:29"));
    let input = write_file(temp_dir.path(), "aligned.sam", &sam);
    let output = temp_dir.path().join("scored.tsv");

    let result = run_mpramap(&[
        "score",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--scoring-mode",
        "cigar",
    ]);
    assert_success(&result);

    let lines = read_lines(&output);
    let cols: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(cols[8], "0.020");
    assert_eq!(cols[10], "PASS");
}
