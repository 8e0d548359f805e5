//! Integration tests for the resolve command.

use tempfile::TempDir;

use crate::helpers::{
    EXAMPLE_GROUPED, assert_failure_contains, assert_success, read_lines, run_mpramap,
    write_file,
};

const GROUPED: &str = "\
BC1\tA,B\t100,5\t105\t1\t0,2\t0.000,0.300\t50M,50M\t:50,:50\t0:50,5:45
BC2\tA,B\t100,15\t115\t1\t0,0\t0.000,0.000\t50M,50M\t:50,:50\t0:50,0:50
BC3\tB\t7\t7\t0\t0\t0.020\t49M1S\t:49\t0:49
BC4\tC\t3\t3\t2\t2\t0.400\t30M20S\t:30\t0:30
";

#[test]
fn test_resolve_example_stays_ambiguous() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "grouped.tsv", &format!("{EXAMPLE_GROUPED}\n"));
    let output = temp_dir.path().join("resolved.tsv");

    let result =
        run_mpramap(&["resolve", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_success(&result);
    assert_eq!(read_lines(&output), vec![EXAMPLE_GROUPED]);
}

#[test]
fn test_resolve_with_assignment_table() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "grouped.tsv", GROUPED);
    let output = temp_dir.path().join("resolved.tsv");
    let assignments = temp_dir.path().join("assignments.tsv");
    let metrics = temp_dir.path().join("metrics.txt");

    let result = run_mpramap(&[
        "resolve",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--assignments",
        assignments.to_str().unwrap(),
        "--assignment-columns",
        "full",
        "--metrics",
        metrics.to_str().unwrap(),
    ]);
    assert_success(&result);

    let input_lines: Vec<&str> = GROUPED.lines().collect();
    assert_eq!(
        read_lines(&output),
        vec![
            "BC1\tA\t100\t105\t0\t0\t0.000\t50M\t:50\t0:50",
            input_lines[1],
            input_lines[2],
            input_lines[3],
        ]
    );
    assert_eq!(
        read_lines(&assignments),
        vec![
            "Barcode\tOligo\tError\tCIGAR\tcs\tAln_Start:Stop\tCoverage",
            "BC1\tA\t0.000\t50M\t:50\t0:50\t100",
            "BC3\tB\t0.020\t49M1S\t:49\t0:49\t7",
        ]
    );
    assert_eq!(
        read_lines(&metrics),
        vec![
            "barcodes\tsingle\tcollapsed\tambiguous\tlineage_collapsed\tassigned",
            "4\t2\t1\t1\t0\t2",
        ]
    );
}

#[test]
fn test_resolve_saturation_mode() {
    let temp_dir = TempDir::new().unwrap();
    let attributes = write_file(
        temp_dir.path(),
        "attributes.tsv",
        "ID\tproject\tsat_ref_parent\n\
         t1\tP\tt1\n\
         t1_m\tP\tt1\n\
         t2\tP\tt2\n",
    );
    let grouped = "\
S1\tt1,t1_m\t100,40\t140\t1\t0,2\t0.000,0.100\t50M,50M\t:50,:50\t0:50,0:50
S2\tt1,t1_m\t100,60\t160\t1\t0,0\t0.000,0.000\t50M,50M\t:50,:50\t0:50,0:50
S3\tt1,t2\t100,40\t140\t1\t0,2\t0.000,0.100\t50M,50M\t:50,:50\t0:50,0:50
";
    let input = write_file(temp_dir.path(), "grouped.tsv", grouped);
    let output = temp_dir.path().join("resolved.tsv");

    let result = run_mpramap(&[
        "resolve",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--lineage-index",
        attributes.to_str().unwrap(),
        "--saturation",
    ]);
    assert_success(&result);

    let lines = read_lines(&output);
    let grouped_lines: Vec<&str> = grouped.lines().collect();
    assert_eq!(lines[0], "S1\tt1\t100\t140\t0\t0\t0.000\t50M\t:50\t0:50");
    assert_eq!(lines[1], grouped_lines[1]);
    assert_eq!(lines[2], grouped_lines[2]);
}

#[test]
fn test_resolve_saturation_without_index() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(temp_dir.path(), "grouped.tsv", GROUPED);
    let output = temp_dir.path().join("resolved.tsv");

    let result = run_mpramap(&[
        "resolve",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--saturation",
    ]);
    assert_failure_contains(&result, "--saturation requires --lineage-index");
    assert!(!output.exists());
}

#[test]
fn test_resolve_malformed_line_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(
        temp_dir.path(),
        "grouped.tsv",
        "BC1\tA\t1\t1\t0\t0\t0.000\t50M\t:50\t0:50\nBC2\tA,B\t1\t1\t0\t0\t0.000\t50M\t:50\t0:50\n",
    );
    let output = temp_dir.path().join("resolved.tsv");

    let result =
        run_mpramap(&["resolve", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_failure_contains(&result, "Invalid grouped line 2");
}
