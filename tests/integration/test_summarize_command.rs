//! Integration tests for the summarize command.

use tempfile::TempDir;

use crate::helpers::{assert_failure_contains, assert_success, read_lines, run_mpramap, write_file};

const GROUPED: &str = "\
BC1\tA\t3\t3\t0\t0\t0.000\t50M\t:50\t0:50
BC2\tA\t5\t5\t0\t0\t0.000\t50M\t:50\t0:50
BC3\tB\t3\t3\t0\t0\t0.010\t50M\t:50\t0:50
BC4\tB\t1\t1\t2\t2\t0.400\t30M20S\t:30\t0:30
BC5\tA,B\t2,1\t3\t1\t0,0\t0.000,0.000\t50M,50M\t:50,:50\t0:50,0:50
";

#[test]
fn test_summarize_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "grouped.tsv", GROUPED);
    let support = temp_dir.path().join("support.tsv");
    let histogram = temp_dir.path().join("histogram.tsv");

    let result = run_mpramap(&[
        "summarize",
        "-i",
        input.to_str().unwrap(),
        "--oligo-support",
        support.to_str().unwrap(),
        "--coverage-histogram",
        histogram.to_str().unwrap(),
    ]);
    assert_success(&result);

    assert_eq!(read_lines(&support), vec!["oligo\tbarcodes\tcoverage", "A\t2\t8", "B\t1\t3"]);
    assert_eq!(
        read_lines(&histogram),
        vec!["coverage\tbarcodes", "1\t1", "3\t3", "5\t1"]
    );
}

#[test]
fn test_summarize_requires_an_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "grouped.tsv", GROUPED);
    let result = run_mpramap(&["summarize", "-i", input.to_str().unwrap()]);
    assert_failure_contains(&result, "--oligo-support");
}
