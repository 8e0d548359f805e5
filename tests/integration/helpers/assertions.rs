//! Assertions and process helpers for running the mpramap binary.

use std::path::Path;
use std::process::{Command, Output};

/// Runs the mpramap binary with the given arguments.
pub fn run_mpramap(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mpramap"))
        .args(args)
        .output()
        .expect("Failed to run mpramap")
}

/// Asserts that a command succeeded, printing its stderr otherwise.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Asserts that a command failed and its stderr contains `needle`.
pub fn assert_failure_contains(output: &Output, needle: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "Command unexpectedly succeeded");
    assert!(stderr.contains(needle), "Expected '{needle}' in stderr:\n{stderr}");
}

/// Reads a text file into its lines.
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(str::to_string)
        .collect()
}
