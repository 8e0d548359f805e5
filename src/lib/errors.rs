//! Custom error types for mpramap operations.

use thiserror::Error;

/// Result type alias for mpramap operations
pub type Result<T> = std::result::Result<T, MpraError>;

/// Failure categories of the resolution pipeline.
///
/// Every [`MpraError`] variant belongs to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed CIGAR, cs tag, or numeric field.
    Parse,
    /// An input line with the wrong shape.
    Schema,
    /// Invalid or inconsistent run configuration.
    Configuration,
    /// Grouper input that is not sorted by its grouping key.
    Ordering,
    /// Conflicting facts recorded for the same barcode.
    Consistency,
}

/// Error type for mpramap operations
#[derive(Error, Debug)]
pub enum MpraError {
    /// A CIGAR string that could not be parsed
    #[error("Invalid CIGAR '{cigar}': {reason}")]
    InvalidCigar {
        /// The full CIGAR string
        cigar: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A cs tag containing an element that is not `:N`, `+seq`, `-seq` or `*xy`
    #[error("Invalid cs tag '{cs}': unexpected element at '{remainder}'")]
    InvalidCsTag {
        /// The full cs tag value
        cs: String,
        /// The unparsed tail, starting at the offending element
        remainder: String,
    },

    /// A numeric field that could not be parsed
    #[error("Invalid {field} value '{value}'")]
    InvalidNumber {
        /// Name of the field
        field: String,
        /// The offending text
        value: String,
    },

    /// An input line with the wrong number of columns
    #[error("Expected {expected} columns but found {found} in line: {line}")]
    ColumnCount {
        /// Number of columns the format requires
        expected: usize,
        /// Number of columns present
        found: usize,
        /// The offending line
        line: String,
    },

    /// Per-candidate lists of one barcode line that disagree in length
    #[error("Barcode '{barcode}' lists {candidates} candidates but {found} values for {field}")]
    CandidateListLength {
        /// The barcode on the offending line
        barcode: String,
        /// Number of candidate ids on the line
        candidates: usize,
        /// The list that disagrees
        field: String,
        /// Number of values in that list
        found: usize,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "lineage index", "SAM")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Grouper input that is not sorted by its grouping key
    #[error(
        "Input is not sorted by barcode: '{current}' follows '{previous}' (sort with LC_ALL=C)"
    )]
    OrderingViolation {
        /// The key of the group that was open
        previous: String,
        /// The smaller key that followed it
        current: String,
    },

    /// The same barcode recorded twice for one sample
    #[error("Duplicate barcode/sample combination {barcode}/{sample}")]
    DuplicateBarcode {
        /// The barcode
        barcode: String,
        /// The sample it was recorded for
        sample: String,
    },

    /// A barcode whose recorded facts disagree between insertions
    #[error("{field} mismatch for barcode {barcode}: '{existing}' vs '{incoming}'")]
    InconsistentAssignment {
        /// The barcode
        barcode: String,
        /// The disagreeing attribute
        field: String,
        /// The value already recorded
        existing: String,
        /// The value being inserted
        incoming: String,
    },
}

impl MpraError {
    /// Convenience constructor for [`MpraError::InvalidNumber`].
    pub fn invalid_number(field: &str, value: &str) -> Self {
        Self::InvalidNumber { field: field.to_string(), value: value.to_string() }
    }

    /// The failure category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCigar { .. } | Self::InvalidCsTag { .. } | Self::InvalidNumber { .. } => {
                ErrorCategory::Parse
            }
            Self::ColumnCount { .. } | Self::CandidateListLength { .. } => ErrorCategory::Schema,
            Self::InvalidParameter { .. } | Self::InvalidFileFormat { .. } => {
                ErrorCategory::Configuration
            }
            Self::OrderingViolation { .. } => ErrorCategory::Ordering,
            Self::DuplicateBarcode { .. } | Self::InconsistentAssignment { .. } => {
                ErrorCategory::Consistency
            }
        }
    }
}
