//! Failure modes shared by all commands.

use tempfile::TempDir;

use crate::helpers::{
    assert_failure_contains, assert_success, run_mpramap, sam_header, sam_line, write_file,
};

#[test]
fn test_missing_input_file() {
    for command in ["score", "group", "resolve", "map"] {
        let result = run_mpramap(&[command, "-i", "/nonexistent/input.tsv", "-o", "-"]);
        assert_failure_contains(&result, "File does not exist");
    }
}

#[test]
fn test_invalid_cutoff() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "aligned.sam", &sam_header(&["A"]));
    let result = run_mpramap(&["score", "-i", input.to_str().unwrap(), "--cutoff", "2"]);
    assert_failure_contains(&result, "cutoff");
}

#[test]
fn test_malformed_cigar_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let mut sam = sam_header(&["A"]);
    sam.push_str(&sam_line("BC1#A", 0, "A", "10M5N35M", ":50"));
    let input = write_file(temp_dir.path(), "aligned.sam", &sam);
    let output = temp_dir.path().join("scored.tsv");

    let result =
        run_mpramap(&["score", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_failure_contains(&result, "Invalid CIGAR");
}

#[test]
fn test_malformed_cs_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let mut sam = sam_header(&["A"]);
    sam.push_str(&sam_line("BC1#A", 0, "A", "50M", ":50~ag"));
    let input = write_file(temp_dir.path(), "aligned.sam", &sam);
    let output = temp_dir.path().join("scored.tsv");

    let result =
        run_mpramap(&["score", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_failure_contains(&result, "Invalid cs tag");
}

#[test]
fn test_empty_input_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "empty.tsv", "");
    let output = temp_dir.path().join("out.tsv");
    for command in ["group", "resolve"] {
        let result =
            run_mpramap(&[command, "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
        assert_success(&result);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    }
}

#[test]
fn test_unknown_scoring_mode() {
    let result = run_mpramap(&["score", "--scoring-mode", "md"]);
    assert_failure_contains(&result, "invalid value");
}
