//! Per-barcode grouping of scored alignments.
//!
//! [`BarcodeGrouper`] consumes scored records sorted by barcode and folds each run of equal
//! barcodes into one [`BarcodeGroup`]: the distinct candidates in first-seen order, how many
//! alignments hit each, and the best (lowest `score_all`) alignment per candidate.
//!
//! The grouper holds exactly one open group. Input order is validated rather than assumed: a
//! barcode that sorts before the open one is an [`MpraError::OrderingViolation`].
//!
//! # Wire format
//!
//! One line per barcode, ten tab-separated columns; list columns are comma-joined with one
//! entry per candidate:
//!
//! | # | Column              | Example           |
//! |---|---------------------|-------------------|
//! | 1 | barcode             | `ACGTACGTAC`      |
//! | 2 | candidate ids       | `OLIGOA,OLIGOB`   |
//! | 3 | coverages           | `12,3`            |
//! | 4 | total coverage      | `15`              |
//! | 5 | group flag          | `0` / `1` / `2`   |
//! | 6 | best status codes   | `0,2`             |
//! | 7 | best scores         | `0.000,0.400`     |
//! | 8 | best CIGARs         | `50M,40M10S`      |
//! | 9 | best cs tags        | `:50,:40`         |
//! | 10| best spans          | `0:50,0:40`       |

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::candidate::CandidateId;
use crate::errors::{MpraError, Result};
use crate::record::{AlignmentRecord, AlignmentSpan, Status, parse_finite};

/// Number of columns in a grouped barcode line.
pub const GROUPED_COLUMNS: usize = 10;

/// Comparison score for an alignment whose `score_all` is undefined.
pub const UNDEFINED_SCORE_RANK: f64 = 1.0;

/// A column of a scored record usable as grouping key or candidate identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordField {
    /// The barcode part of the query name.
    BarcodeId,
    /// The candidate part of the query name.
    CandidateOligoId,
    /// The reference name with the reverse-strand marker.
    TaggedReference,
    /// The reference name as aligned.
    Reference,
}

impl RecordField {
    /// The value of this field in a record.
    #[must_use]
    pub fn value(self, record: &AlignmentRecord) -> &str {
        match self {
            Self::BarcodeId => &record.barcode_id,
            Self::CandidateOligoId => &record.candidate_oligo_id,
            Self::TaggedReference => &record.tagged_reference,
            Self::Reference => &record.reference,
        }
    }
}

/// Which record fields the grouper keys on and compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingFields {
    /// Field whose runs form one group.
    pub key: RecordField,
    /// Field identifying a candidate within a group.
    pub candidate: RecordField,
}

impl Default for GroupingFields {
    fn default() -> Self {
        Self { key: RecordField::BarcodeId, candidate: RecordField::TaggedReference }
    }
}

/// Group-level flag: collision, or the pass state of a single-candidate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupFlag {
    /// One candidate and at least one PASSing alignment.
    Pass,
    /// More than one distinct candidate.
    Collision,
    /// One candidate and no PASSing alignment.
    Fail,
}

impl GroupFlag {
    /// Wire code: `0`, `1` or `2`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pass => "0",
            Self::Collision => "1",
            Self::Fail => "2",
        }
    }
}

impl fmt::Display for GroupFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GroupFlag {
    type Err = MpraError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" => Ok(Self::Pass),
            "1" => Ok(Self::Collision),
            "2" => Ok(Self::Fail),
            other => Err(MpraError::invalid_number("group flag", other)),
        }
    }
}

/// Wire code of a best-alignment status: `0` for PASS, `2` for FAIL.
#[must_use]
pub const fn status_code(status: Status) -> &'static str {
    match status {
        Status::Pass => "0",
        Status::Fail => "2",
    }
}

fn parse_status_code(code: &str) -> Result<Status> {
    match code {
        "0" => Ok(Status::Pass),
        "2" => Ok(Status::Fail),
        other => Err(MpraError::invalid_number("best status", other)),
    }
}

/// The representative alignment of one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct BestAlignment {
    /// Status of the alignment.
    pub status: Status,
    /// `score_all`, or [`UNDEFINED_SCORE_RANK`] when undefined.
    pub score: f64,
    /// CIGAR string.
    pub cigar: String,
    /// cs tag.
    pub cs: String,
    /// Alignment span.
    pub position: AlignmentSpan,
}

impl BestAlignment {
    fn from_record(record: &AlignmentRecord) -> Self {
        Self {
            status: record.status,
            score: record.score_all.unwrap_or(UNDEFINED_SCORE_RANK),
            cigar: record.cigar.clone(),
            cs: record.cs.clone(),
            position: record.position,
        }
    }

    /// True if the alignment has a zero mismatch score.
    ///
    /// The score is `score_all`: an exact alignment has no CIGAR-derived mismatch or
    /// substitution, and covers the whole reference.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.score == 0.0
    }
}

/// One candidate of a barcode.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSummary {
    /// Candidate identifier.
    pub id: CandidateId,
    /// Number of alignments of the barcode to this candidate.
    pub coverage: u64,
    /// Lowest-scoring alignment; the first seen wins ties.
    pub best: BestAlignment,
}

/// All candidates of one barcode.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeGroup {
    /// The grouping key.
    pub barcode: String,
    /// Candidates in first-seen order; never empty.
    pub candidates: Vec<CandidateSummary>,
    /// Total coverage of the barcode.
    pub total: u64,
    /// Collision/pass flag.
    pub flag: GroupFlag,
}

impl BarcodeGroup {
    /// True if more than one distinct candidate was seen.
    #[must_use]
    pub fn is_collision(&self) -> bool {
        self.candidates.len() > 1
    }

    /// Renders the group as one tab-separated line, without the newline.
    #[must_use]
    pub fn to_tsv_line(&self) -> String {
        [
            self.barcode.clone(),
            self.join_candidates(|c| c.id.to_string()),
            self.join_candidates(|c| c.coverage.to_string()),
            self.total.to_string(),
            self.flag.to_string(),
            self.join_candidates(|c| status_code(c.best.status).to_string()),
            self.join_candidates(|c| format!("{:.3}", c.best.score)),
            self.join_candidates(|c| c.best.cigar.clone()),
            self.join_candidates(|c| c.best.cs.clone()),
            self.join_candidates(|c| c.best.position.to_string()),
        ]
        .join("\t")
    }

    fn join_candidates(&self, render: impl Fn(&CandidateSummary) -> String) -> String {
        self.candidates.iter().map(render).collect::<Vec<_>>().join(",")
    }

    /// Parses a grouped barcode line.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the line does not have ten columns or its candidate lists
    /// differ in length, and a parse error for a malformed numeric field.
    pub fn from_tsv_line(line: &str) -> Result<Self> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() != GROUPED_COLUMNS {
            return Err(MpraError::ColumnCount {
                expected: GROUPED_COLUMNS,
                found: cols.len(),
                line: line.to_string(),
            });
        }

        let barcode = cols[0];
        let ids: Vec<&str> = cols[1].split(',').collect();
        let list = |index: usize, field: &str| -> Result<Vec<&str>> {
            let values: Vec<&str> = cols[index].split(',').collect();
            if values.len() == ids.len() {
                Ok(values)
            } else {
                Err(MpraError::CandidateListLength {
                    barcode: barcode.to_string(),
                    candidates: ids.len(),
                    field: field.to_string(),
                    found: values.len(),
                })
            }
        };
        let coverages = list(2, "coverage")?;
        let statuses = list(5, "status")?;
        let scores = list(6, "score")?;
        let cigars = list(7, "cigar")?;
        let cs_tags = list(8, "cs")?;
        let positions = list(9, "position")?;

        let mut candidates = Vec::with_capacity(ids.len());
        for i in 0..ids.len() {
            candidates.push(CandidateSummary {
                id: CandidateId::parse(ids[i]),
                coverage: coverages[i]
                    .parse()
                    .map_err(|_| MpraError::invalid_number("coverage", coverages[i]))?,
                best: BestAlignment {
                    status: parse_status_code(statuses[i])?,
                    score: parse_finite(scores[i], "score")?,
                    cigar: cigars[i].to_string(),
                    cs: cs_tags[i].to_string(),
                    position: positions[i].parse()?,
                },
            });
        }

        Ok(Self {
            barcode: barcode.to_string(),
            candidates,
            total: cols[3].parse().map_err(|_| MpraError::invalid_number("total", cols[3]))?,
            flag: cols[4].parse()?,
        })
    }
}

/// The group being accumulated.
#[derive(Debug)]
struct OpenGroup {
    key: String,
    candidates: Vec<CandidateSummary>,
    any_pass: bool,
}

impl OpenGroup {
    fn new(key: &str, candidate: &str, record: &AlignmentRecord) -> Self {
        let mut group = Self { key: key.to_string(), candidates: Vec::new(), any_pass: false };
        group.fold(candidate, record);
        group
    }

    fn fold(&mut self, candidate: &str, record: &AlignmentRecord) {
        self.any_pass |= record.status == Status::Pass;
        let best = BestAlignment::from_record(record);
        match self.candidates.iter_mut().find(|c| c.id.as_str() == candidate) {
            Some(summary) => {
                summary.coverage += 1;
                if best.score < summary.best.score {
                    summary.best = best;
                }
            }
            None => self.candidates.push(CandidateSummary {
                id: CandidateId::parse(candidate),
                coverage: 1,
                best,
            }),
        }
    }

    fn finish(self) -> BarcodeGroup {
        let flag = if self.candidates.len() > 1 {
            GroupFlag::Collision
        } else if self.any_pass {
            GroupFlag::Pass
        } else {
            GroupFlag::Fail
        };
        let total = self.candidates.iter().map(|c| c.coverage).sum();
        BarcodeGroup { barcode: self.key, candidates: self.candidates, total, flag }
    }
}

#[derive(Debug)]
enum GrouperState {
    Idle,
    Open(OpenGroup),
}

/// Streaming state machine folding sorted scored records into [`BarcodeGroup`]s.
///
/// # Example
/// ```
/// use mpramap_lib::grouper::{BarcodeGrouper, GroupingFields};
/// use mpramap_lib::record::AlignmentRecord;
///
/// let line = "BC1\tOLIGOA\t1\tOLIGOA\tOLIGOA\t60\t50\t50M\t0.000\tACGT\tPASS\t0.000\t:50\t0:50";
/// let record = AlignmentRecord::from_tsv_line(line).unwrap().unwrap();
///
/// let mut grouper = BarcodeGrouper::new(GroupingFields::default());
/// assert!(grouper.push(&record).unwrap().is_none());
/// let group = grouper.finish().unwrap();
/// assert_eq!(group.barcode, "BC1");
/// assert_eq!(group.total, 1);
/// ```
#[derive(Debug)]
pub struct BarcodeGrouper {
    fields: GroupingFields,
    state: GrouperState,
}

impl BarcodeGrouper {
    /// Creates an idle grouper.
    #[must_use]
    pub fn new(fields: GroupingFields) -> Self {
        Self { fields, state: GrouperState::Idle }
    }

    /// Folds a record into the open group.
    ///
    /// Returns the completed previous group when the record starts a new one.
    ///
    /// # Errors
    ///
    /// Returns [`MpraError::OrderingViolation`] if the record's key sorts before the open
    /// group's key.
    pub fn push(&mut self, record: &AlignmentRecord) -> Result<Option<BarcodeGroup>> {
        let key = self.fields.key.value(record);
        let candidate = self.fields.candidate.value(record);

        match std::mem::replace(&mut self.state, GrouperState::Idle) {
            GrouperState::Idle => {
                self.state = GrouperState::Open(OpenGroup::new(key, candidate, record));
                Ok(None)
            }
            GrouperState::Open(mut open) => match key.as_bytes().cmp(open.key.as_bytes()) {
                Ordering::Equal => {
                    open.fold(candidate, record);
                    self.state = GrouperState::Open(open);
                    Ok(None)
                }
                Ordering::Greater => {
                    self.state = GrouperState::Open(OpenGroup::new(key, candidate, record));
                    Ok(Some(open.finish()))
                }
                Ordering::Less => Err(MpraError::OrderingViolation {
                    previous: open.key,
                    current: key.to_string(),
                }),
            },
        }
    }

    /// Flushes the open group, if any, returning the grouper to idle.
    pub fn finish(&mut self) -> Option<BarcodeGroup> {
        match std::mem::replace(&mut self.state, GrouperState::Idle) {
            GrouperState::Idle => None,
            GrouperState::Open(open) => Some(open.finish()),
        }
    }
}
