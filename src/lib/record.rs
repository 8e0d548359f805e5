//! Scored alignment records and their tab-separated wire format.
//!
//! One [`AlignmentRecord`] is produced per input alignment by the scorer and consumed by the
//! grouper. The 14-column line layout is:
//!
//! | # | Column               | Example        |
//! |---|----------------------|----------------|
//! | 1 | barcode id           | `ACGTACGTAC`   |
//! | 2 | candidate oligo id   | `OLIGOA`       |
//! | 3 | forward strand flag  | `1` / `0`      |
//! | 4 | tagged reference     | `tile_RC_3`    |
//! | 5 | reference            | `tile_3`       |
//! | 6 | mapping quality      | `60` / `NA`    |
//! | 7 | reference length     | `200`          |
//! | 8 | CIGAR                | `200M`         |
//! | 9 | `score_all`          | `0.005` / `-`  |
//! | 10| oriented sequence    | `ACGT...`      |
//! | 11| status               | `PASS` / `FAIL`|
//! | 12| `score`              | `0.000` / `-`  |
//! | 13| cs tag               | `:200` / `*`   |
//! | 14| alignment span       | `0:200`        |

use std::fmt;
use std::str::FromStr;

use crate::errors::{MpraError, Result};

/// Number of columns in a scored alignment line.
pub const SCORED_COLUMNS: usize = 14;

/// Rendering of an undefined score.
pub const UNDEFINED_SCORE: &str = "-";

/// Rendering of an undefined categorical attribute.
pub const NOT_AVAILABLE: &str = "NA";

/// Renders a score with three decimals, or [`UNDEFINED_SCORE`] when undefined.
///
/// # Examples
///
/// ```
/// use mpramap_lib::record::format_score;
///
/// assert_eq!(format_score(Some(0.2)), "0.200");
/// assert_eq!(format_score(Some(1.0 / 3.0)), "0.333");
/// assert_eq!(format_score(None), "-");
/// ```
#[must_use]
pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| UNDEFINED_SCORE.to_string(), |s| format!("{s:.3}"))
}

/// Parses a score column, mapping [`UNDEFINED_SCORE`] to `None`.
///
/// # Errors
///
/// Returns [`MpraError::InvalidNumber`] if the text is neither `-` nor a finite number.
pub fn parse_score(text: &str, field: &str) -> Result<Option<f64>> {
    if text == UNDEFINED_SCORE {
        return Ok(None);
    }
    parse_finite(text, field).map(Some)
}

/// Parses a finite floating-point field. `NaN` and infinities are rejected.
///
/// # Errors
///
/// Returns [`MpraError::InvalidNumber`] if the text is not a finite number.
pub fn parse_finite(text: &str, field: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| MpraError::invalid_number(field, text))
}

/// PASS/FAIL outcome of scoring one alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `score_all` at or below the cutoff.
    Pass,
    /// `score_all` above the cutoff, or undefined.
    Fail,
}

impl Status {
    /// Wire rendering: `PASS` or `FAIL`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = MpraError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PASS" => Ok(Self::Pass),
            "FAIL" => Ok(Self::Fail),
            other => Err(MpraError::invalid_number("status", other)),
        }
    }
}

/// Zero-based alignment start and aligned reference length, rendered `start:length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentSpan {
    /// Zero-based start; `-1` for unplaced reads.
    pub start: i64,
    /// Reference bases covered by the alignment.
    pub length: u64,
}

impl fmt::Display for AlignmentSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.length)
    }
}

impl FromStr for AlignmentSpan {
    type Err = MpraError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MpraError::invalid_number("alignment span", s);
        let (start, length) = s.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            start: start.parse().map_err(|_| invalid())?,
            length: length.parse().map_err(|_| invalid())?,
        })
    }
}

/// One scored alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    /// Barcode part of the query name.
    pub barcode_id: String,
    /// Candidate part of the query name; empty when the name had no delimiter.
    pub candidate_oligo_id: String,
    /// True unless the alignment is on the reverse strand.
    pub forward: bool,
    /// Reference name, with the reverse-strand marker inserted for reverse alignments.
    pub tagged_reference: String,
    /// Reference name as aligned.
    pub reference: String,
    /// Mapping quality as text; `NA` when unavailable.
    pub mapping_quality: String,
    /// Length of the reference from the header; 0 when unknown.
    pub reference_length: u64,
    /// CIGAR string as aligned.
    pub cigar: String,
    /// Normalized mismatch rate including unaligned reference and substitutions.
    pub score_all: Option<f64>,
    /// Read sequence in reference orientation.
    pub sequence: String,
    /// PASS/FAIL against the cutoff.
    pub status: Status,
    /// CIGAR-only normalized mismatch rate.
    pub score: Option<f64>,
    /// cs tag value, `*` when absent.
    pub cs: String,
    /// Alignment start and length.
    pub position: AlignmentSpan,
}

impl AlignmentRecord {
    /// Renders the record as one tab-separated line, without the newline.
    #[must_use]
    pub fn to_tsv_line(&self) -> String {
        [
            self.barcode_id.as_str(),
            self.candidate_oligo_id.as_str(),
            if self.forward { "1" } else { "0" },
            self.tagged_reference.as_str(),
            self.reference.as_str(),
            self.mapping_quality.as_str(),
            &self.reference_length.to_string(),
            self.cigar.as_str(),
            &format_score(self.score_all),
            self.sequence.as_str(),
            self.status.as_str(),
            &format_score(self.score),
            self.cs.as_str(),
            &self.position.to_string(),
        ]
        .join("\t")
    }

    /// Parses a scored line.
    ///
    /// Returns `Ok(None)` when the line does not have exactly 14 columns, so callers can drop
    /// it as a schema error.
    ///
    /// # Errors
    ///
    /// Returns [`MpraError::InvalidNumber`] when a numeric column cannot be parsed.
    pub fn from_tsv_line(line: &str) -> Result<Option<Self>> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() != SCORED_COLUMNS {
            return Ok(None);
        }

        let forward = match cols[2] {
            "1" => true,
            "0" => false,
            other => return Err(MpraError::invalid_number("strand flag", other)),
        };
        let reference_length = cols[6]
            .parse::<u64>()
            .map_err(|_| MpraError::invalid_number("reference length", cols[6]))?;

        Ok(Some(Self {
            barcode_id: cols[0].to_string(),
            candidate_oligo_id: cols[1].to_string(),
            forward,
            tagged_reference: cols[3].to_string(),
            reference: cols[4].to_string(),
            mapping_quality: cols[5].to_string(),
            reference_length,
            cigar: cols[7].to_string(),
            score_all: parse_score(cols[8], "score_all")?,
            sequence: cols[9].to_string(),
            status: cols[10].parse()?,
            score: parse_score(cols[11], "score")?,
            cs: cols[12].to_string(),
            position: cols[13].parse()?,
        }))
    }
}
