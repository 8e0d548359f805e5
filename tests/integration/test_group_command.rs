//! Integration tests for the group command.

use tempfile::TempDir;

use crate::helpers::{
    EXAMPLE_GROUPED, EXAMPLE_SCORED_A, EXAMPLE_SCORED_B, assert_failure_contains, assert_success,
    read_lines, run_mpramap, write_file,
};

fn scored(barcode: &str, oligo: &str, score_all: &str, status: &str) -> String {
    format!(
        "{barcode}\t{oligo}\t1\t{oligo}\t{oligo}\t60\t50\t50M\t{score_all}\tACGT\t{status}\t\
         0.000\t:50\t0:50"
    )
}

#[test]
fn test_group_example() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(
        temp_dir.path(),
        "scored.tsv",
        &format!("{EXAMPLE_SCORED_A}\n{EXAMPLE_SCORED_B}\n"),
    );
    let output = temp_dir.path().join("grouped.tsv");

    let result =
        run_mpramap(&["group", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_success(&result);
    assert_eq!(read_lines(&output), vec![EXAMPLE_GROUPED]);
}

#[test]
fn test_group_keeps_best_alignment_and_counts_coverage() {
    let temp_dir = TempDir::new().unwrap();
    let lines = [
        scored("AAA", "t1", "0.100", "FAIL"),
        scored("AAA", "t1", "0.020", "PASS"),
        scored("AAA", "t1", "0.060", "FAIL"),
        scored("CCC", "t2", "0.300", "FAIL"),
        "malformed\tline".to_string(),
        scored("GGG", "t1", "0.000", "PASS"),
    ];
    let input = write_file(temp_dir.path(), "scored.tsv", &(lines.join("\n") + "\n"));
    let output = temp_dir.path().join("grouped.tsv");
    let metrics = temp_dir.path().join("metrics.txt");

    let result = run_mpramap(&[
        "group",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--metrics",
        metrics.to_str().unwrap(),
    ]);
    assert_success(&result);

    assert_eq!(
        read_lines(&output),
        vec![
            "AAA\tt1\t3\t3\t0\t0\t0.020\t50M\t:50\t0:50",
            "CCC\tt2\t1\t1\t2\t2\t0.300\t50M\t:50\t0:50",
            "GGG\tt1\t1\t1\t0\t0\t0.000\t50M\t:50\t0:50",
        ]
    );
    assert_eq!(
        read_lines(&metrics),
        vec![
            "records_read\tmalformed_lines\tbarcodes\tcollisions\tpassing\tfailing",
            "5\t1\t3\t0\t2\t1",
        ]
    );
}

#[test]
fn test_group_candidate_field() {
    let temp_dir = TempDir::new().unwrap();
    let lines = [
        "BC1\tt1\t1\tt1\tt1\t60\t50\t50M\t0.000\tACGT\tPASS\t0.000\t:50\t0:50",
        "BC1\tt1\t0\tt_RC_1\tt1\t60\t50\t50M\t0.000\tACGT\tPASS\t0.000\t:50\t0:50",
    ];
    let input = write_file(temp_dir.path(), "scored.tsv", &(lines.join("\n") + "\n"));
    let output = temp_dir.path().join("grouped.tsv");

    let result = run_mpramap(&[
        "group",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--candidate-field",
        "reference",
    ]);
    assert_success(&result);
    assert_eq!(read_lines(&output), vec!["BC1\tt1\t2\t2\t0\t0\t0.000\t50M\t:50\t0:50"]);
}

#[test]
fn test_group_rejects_unsorted_input() {
    let temp_dir = TempDir::new().unwrap();
    let lines = [scored("BBB", "t1", "0.000", "PASS"), scored("AAA", "t1", "0.000", "PASS")];
    let input = write_file(temp_dir.path(), "scored.tsv", &(lines.join("\n") + "\n"));
    let output = temp_dir.path().join("grouped.tsv");

    let result =
        run_mpramap(&["group", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_failure_contains(&result, "not sorted by barcode");
}
