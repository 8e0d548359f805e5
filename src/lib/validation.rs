//! Input validation utilities
//!
//! This module provides common validation functions for command-line parameters
//! and file paths with consistent error messages.
//!
//! All validation functions use structured error types from [`crate::errors`] to provide
//! rich contextual information when validation fails.

use crate::errors::{MpraError, Result};
use crate::io::is_stdin_path;
use std::path::Path;

/// Validate that a file exists
///
/// The stdin path `-` is always accepted.
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input SAM", "Lineage index")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use mpramap_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.sam", "Input file");
/// assert!(result.is_err());
/// assert!(validate_file_exists("-", "Input file").is_ok());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !is_stdin_path(path_ref) && !path_ref.exists() {
        return Err(MpraError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that a rate or fraction is in the valid range [0.0, 1.0]
///
/// # Arguments
/// * `value` - Value to validate
/// * `name` - Name of the parameter for error messages
///
/// # Errors
/// Returns an error if the value is not in [0.0, 1.0] (NaN included)
///
/// # Example
/// ```
/// use mpramap_lib::validation::validate_fraction;
///
/// validate_fraction(0.05, "max-mismatch-rate").unwrap();
/// validate_fraction(1.0, "max-mismatch-rate").unwrap();
///
/// assert!(validate_fraction(1.5, "max-mismatch-rate").is_err());
/// ```
pub fn validate_fraction(value: f64, name: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MpraError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be between 0 and 1, got: {value}"),
        });
    }
    Ok(())
}
