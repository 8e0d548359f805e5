//! Alignment scoring.
//!
//! Each alignment of a `barcode#candidate` read against a designed oligo is reduced to two
//! normalized mismatch rates:
//!
//! - `score = cigar_mismatch / reference_length`
//! - `score_all = (cigar_mismatch + extra + unaligned_length) / reference_length`
//!
//! where `cigar_mismatch` counts inserted, deleted and clipped bases, `unaligned_length` is the
//! part of the reference the alignment does not cover, and `extra` is either the CIGAR `X` count
//! or the cs-tag substitution count depending on [`ScoringMode`]. An alignment passes when its
//! `score_all`, as rendered with three decimals, is at or below the cutoff.

use ahash::AHashMap;
use clap::ValueEnum;

use crate::cigar::CigarTally;
use crate::cs::{CsTally, MISSING_CS};
use crate::dna::reverse_complement_str;
use crate::errors::Result;
use crate::record::{AlignmentRecord, AlignmentSpan, Status, format_score};

/// SAM flag bit marking a reverse-strand alignment.
pub const REVERSE_STRAND_FLAG: u16 = 0x10;

/// Separator between barcode and candidate in a query name.
pub const QUERY_NAME_DELIMITER: char = '#';

/// Marker inserted into reference names of reverse-strand alignments.
pub const REVERSE_STRAND_MARKER: &str = "_RC_";

/// Default maximum `score_all` for a PASS.
pub const DEFAULT_SCORE_CUTOFF: f64 = 0.05;

/// Which substitution count contributes to `score_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScoringMode {
    /// Substitutions from the cs tag (`*xy` elements).
    #[default]
    Cs,
    /// Substitutions from CIGAR `X` operations.
    Cigar,
}

/// Scorer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerConfig {
    /// Maximum rendered `score_all` for a PASS.
    pub cutoff: f64,
    /// Substitution source for `score_all`.
    pub mode: ScoringMode,
    /// Drop reverse-strand alignments instead of scoring them.
    pub forward_only: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self { cutoff: DEFAULT_SCORE_CUTOFF, mode: ScoringMode::default(), forward_only: false }
    }
}

/// The fields of one input alignment the scorer needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentLine {
    /// Query name, `barcode#candidate`.
    pub query_name: String,
    /// SAM flag.
    pub flags: u16,
    /// Reference name, `*` when unplaced.
    pub reference: String,
    /// One-based alignment start, 0 when unplaced.
    pub position: i64,
    /// Mapping quality as text.
    pub mapping_quality: String,
    /// CIGAR string, `*` when unavailable.
    pub cigar: String,
    /// Read sequence as stored, `*` when unavailable.
    pub sequence: String,
    /// Value of the `cs:Z` tag, if present.
    pub cs: Option<String>,
}

impl AlignmentLine {
    /// True if the reverse-strand flag bit is set.
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.flags & REVERSE_STRAND_FLAG != 0
    }
}

/// Reference name to reference length, built from alignment header `@SQ` lines.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    lengths: AHashMap<String, u64>,
}

impl ReferenceIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the length of a reference.
    pub fn insert(&mut self, name: impl Into<String>, length: u64) {
        self.lengths.insert(name.into(), length);
    }

    /// Records the reference described by a SAM `@SQ` header line.
    ///
    /// Lines without both `SN` and a numeric `LN` are ignored. Returns true if a reference was
    /// recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpramap_lib::scorer::ReferenceIndex;
    ///
    /// let mut index = ReferenceIndex::new();
    /// assert!(index.add_header_line("@SQ\tSN:OLIGOA\tLN:50"));
    /// assert!(!index.add_header_line("@PG\tID:minimap2"));
    /// assert_eq!(index.length_of("OLIGOA"), 50);
    /// assert_eq!(index.length_of("OLIGOB"), 0);
    /// ```
    pub fn add_header_line(&mut self, line: &str) -> bool {
        if !line.starts_with("@SQ") {
            return false;
        }
        let mut name = None;
        let mut length = None;
        for field in line.split('\t').skip(1) {
            if let Some(value) = field.strip_prefix("SN:") {
                name = Some(value);
            } else if let Some(value) = field.strip_prefix("LN:") {
                length = value.parse::<u64>().ok();
            }
        }
        match (name, length) {
            (Some(name), Some(length)) => {
                self.insert(name, length);
                true
            }
            _ => false,
        }
    }

    /// Length of a reference; 0 when the reference is unknown.
    #[must_use]
    pub fn length_of(&self, name: &str) -> u64 {
        self.lengths.get(name).copied().unwrap_or(0)
    }

    /// Number of references indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// True if no reference is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

/// Inserts [`REVERSE_STRAND_MARKER`] after the first `_`-delimited token of a reference name.
///
/// # Examples
///
/// ```
/// use mpramap_lib::scorer::tag_reverse_reference;
///
/// assert_eq!(tag_reverse_reference("tileA_1"), "tileA_RC_1");
/// assert_eq!(tag_reverse_reference("OLIGO"), "OLIGO_RC_");
/// ```
#[must_use]
pub fn tag_reverse_reference(name: &str) -> String {
    match name.split_once('_') {
        Some((head, tail)) => format!("{head}{REVERSE_STRAND_MARKER}{tail}"),
        None => format!("{name}{REVERSE_STRAND_MARKER}"),
    }
}

/// Splits a query name into barcode and candidate at the first delimiter.
///
/// A name without the delimiter is all barcode with an empty candidate.
#[must_use]
pub fn split_query_name(name: &str) -> (&str, &str) {
    name.split_once(QUERY_NAME_DELIMITER).unwrap_or((name, ""))
}

/// The value a score takes once rendered with three decimals. Scores are stored rounded so a
/// record behaves the same whether it is passed on in memory or as text.
fn rendered(score: f64) -> f64 {
    format_score(Some(score)).parse().unwrap_or(score)
}

/// Scores alignments against a fixed reference index.
#[derive(Debug, Clone)]
pub struct AlignmentScorer {
    config: ScorerConfig,
    references: ReferenceIndex,
}

impl AlignmentScorer {
    /// Creates a scorer.
    #[must_use]
    pub fn new(config: ScorerConfig, references: ReferenceIndex) -> Self {
        Self { config, references }
    }

    /// The scorer's settings.
    #[must_use]
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Scores one alignment.
    ///
    /// Returns `Ok(None)` for a reverse-strand alignment when reverse strands are filtered.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed CIGAR string or cs tag.
    pub fn score(&self, line: &AlignmentLine) -> Result<Option<AlignmentRecord>> {
        let reverse = line.is_reverse();
        if reverse && self.config.forward_only {
            return Ok(None);
        }

        let cs = line.cs.as_deref().unwrap_or(MISSING_CS);
        let cigar = CigarTally::parse(&line.cigar)?;
        let cs_tally = CsTally::parse(cs)?;
        let reference_length = self.references.length_of(&line.reference);

        let (score, score_all) = if reference_length == 0 {
            (None, None)
        } else {
            let size = reference_length as f64;
            let (mismatch, unaligned) = (
                cigar.mismatches as f64,
                reference_length as f64 - cigar.aligned_length as f64,
            );
            let extra = match self.config.mode {
                ScoringMode::Cigar => cigar.substitutions as f64,
                ScoringMode::Cs => cs_tally.mismatches,
            };
            let score_all = ((mismatch + extra + unaligned) / size).max(0.0);
            (Some(rendered(mismatch / size)), Some(rendered(score_all)))
        };

        let status = match score_all {
            Some(s) if s <= self.config.cutoff => Status::Pass,
            _ => Status::Fail,
        };

        let (barcode_id, candidate_oligo_id) = split_query_name(&line.query_name);
        let (tagged_reference, sequence) = if reverse {
            (tag_reverse_reference(&line.reference), reverse_complement_str(&line.sequence))
        } else {
            (line.reference.clone(), line.sequence.clone())
        };

        let position = AlignmentSpan { start: line.position - 1, length: cigar.aligned_length };

        Ok(Some(AlignmentRecord {
            barcode_id: barcode_id.to_string(),
            candidate_oligo_id: candidate_oligo_id.to_string(),
            forward: !reverse,
            tagged_reference,
            reference: line.reference.clone(),
            mapping_quality: line.mapping_quality.clone(),
            reference_length,
            cigar: line.cigar.clone(),
            score_all,
            sequence,
            status,
            score,
            cs: cs.to_string(),
            position,
        }))
    }
}
