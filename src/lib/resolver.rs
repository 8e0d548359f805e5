//! Coverage-ratio conflict resolution.
//!
//! A barcode seen with several candidates is collapsed to its highest-coverage candidate unless
//! another candidate has enough relative support to make the assignment ambiguous. With a
//! [`LineageIndex`], candidates that are variants of the same parent sequence need more
//! support to count as competitors.

use std::borrow::Cow;

use crate::grouper::{BarcodeGroup, CandidateSummary, GroupFlag};
use crate::lineage::LineageIndex;
use crate::record::Status;

/// Coverage ratio above which a competing candidate keeps a barcode ambiguous.
pub const DEFAULT_AMBIGUITY_RATIO: f64 = 0.1;

/// Coverage ratio above which a same-lineage competitor keeps a barcode ambiguous.
pub const DEFAULT_SAME_LINEAGE_RATIO: f64 = 0.5;

/// How a barcode was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Only one candidate was ever seen.
    Single,
    /// Competing candidates were dropped in favour of the highest-coverage one.
    CollapsedWinner,
    /// Competing candidates have too much support; all are kept.
    KeptAmbiguous,
}

/// Resolver settings.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Lineage index enabling saturation-mutagenesis mode.
    pub saturation: Option<LineageIndex>,
    /// See [`DEFAULT_AMBIGUITY_RATIO`].
    pub ambiguity_ratio: f64,
    /// See [`DEFAULT_SAME_LINEAGE_RATIO`].
    pub same_lineage_ratio: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            saturation: None,
            ambiguity_ratio: DEFAULT_AMBIGUITY_RATIO,
            same_lineage_ratio: DEFAULT_SAME_LINEAGE_RATIO,
        }
    }
}

/// The outcome of resolving one barcode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssignment {
    /// How the barcode was resolved.
    pub mode: ResolutionMode,
    /// The retained record: one candidate unless kept ambiguous.
    pub group: BarcodeGroup,
    /// True if the barcode collapsed only because its competitors share the winner's lineage.
    pub lineage_collapse: bool,
}

impl ResolvedAssignment {
    /// The single retained candidate, or `None` when kept ambiguous.
    #[must_use]
    pub fn winner(&self) -> Option<&CandidateSummary> {
        match self.mode {
            ResolutionMode::KeptAmbiguous => None,
            ResolutionMode::Single | ResolutionMode::CollapsedWinner => {
                self.group.candidates.first()
            }
        }
    }

    /// Renders the retained record in the grouped line format.
    #[must_use]
    pub fn to_tsv_line(&self) -> String {
        self.group.to_tsv_line()
    }

    /// The output line for a barcode parsed from `input`.
    ///
    /// Single and kept-ambiguous barcodes pass through as `input`, byte for byte. Only a
    /// collapsed barcode is rendered anew from its winner.
    #[must_use]
    pub fn render_from<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match self.mode {
            ResolutionMode::Single | ResolutionMode::KeptAmbiguous => Cow::Borrowed(input),
            ResolutionMode::CollapsedWinner => Cow::Owned(self.to_tsv_line()),
        }
    }
}

/// Index of the first candidate with the highest coverage.
fn max_coverage_index(candidates: &[CandidateSummary]) -> usize {
    let mut best = 0;
    for (i, c) in candidates.iter().enumerate().skip(1) {
        if c.coverage > candidates[best].coverage {
            best = i;
        }
    }
    best
}

/// Resolves grouped barcodes to a single oligo where the evidence allows it.
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    config: ResolverConfig,
}

impl ConflictResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// True if a lineage index was supplied.
    #[must_use]
    pub fn is_saturation(&self) -> bool {
        self.config.saturation.is_some()
    }

    /// Resolves one barcode.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpramap_lib::grouper::BarcodeGroup;
    /// use mpramap_lib::resolver::{ConflictResolver, ResolutionMode};
    ///
    /// let line = "BC1\tA,B\t100,5\t105\t1\t0,0\t0.000,0.000\t50M,50M\t:50,:50\t0:50,0:50";
    /// let group = BarcodeGroup::from_tsv_line(line).unwrap();
    /// let resolved = ConflictResolver::default().resolve(group);
    /// assert_eq!(resolved.mode, ResolutionMode::CollapsedWinner);
    /// assert_eq!(resolved.to_tsv_line(), "BC1\tA\t100\t105\t0\t0\t0.000\t50M\t:50\t0:50");
    /// ```
    #[must_use]
    pub fn resolve(&self, mut group: BarcodeGroup) -> ResolvedAssignment {
        if group.candidates.len() <= 1 {
            return ResolvedAssignment {
                mode: ResolutionMode::Single,
                group,
                lineage_collapse: false,
            };
        }

        let max_idx = max_coverage_index(&group.candidates);
        let max = &group.candidates[max_idx];
        let max_cov = max.coverage as f64;

        let mut ambiguous = false;
        let mut exceeds_base_ratio = false;
        for (i, candidate) in group.candidates.iter().enumerate() {
            if i == max_idx {
                continue;
            }
            if candidate.coverage == max.coverage {
                ambiguous = true;
                continue;
            }

            let ratio = if max_cov > 0.0 { candidate.coverage as f64 / max_cov } else { 0.0 };
            exceeds_base_ratio |= ratio > self.config.ambiguity_ratio;
            ambiguous |= match &self.config.saturation {
                None => ratio > self.config.ambiguity_ratio,
                Some(index) => self.saturation_competes(index, candidate, max, ratio),
            };
        }

        if ambiguous {
            return ResolvedAssignment {
                mode: ResolutionMode::KeptAmbiguous,
                group,
                lineage_collapse: false,
            };
        }

        let winner = group.candidates.swap_remove(max_idx);
        group.flag = match winner.best.status {
            Status::Pass => GroupFlag::Pass,
            Status::Fail => GroupFlag::Fail,
        };
        group.candidates = vec![winner];
        ResolvedAssignment {
            mode: ResolutionMode::CollapsedWinner,
            group,
            lineage_collapse: self.is_saturation() && exceeds_base_ratio,
        }
    }

    /// Whether `candidate` keeps the barcode ambiguous against `max` in saturation mode.
    fn saturation_competes(
        &self,
        index: &LineageIndex,
        candidate: &CandidateSummary,
        max: &CandidateSummary,
        ratio: f64,
    ) -> bool {
        if ratio > self.config.ambiguity_ratio && candidate.best.is_exact() && max.best.is_exact()
        {
            return true;
        }
        if ratio <= 0.0 {
            return false;
        }
        candidate.id.sub_ids().iter().any(|a| {
            max.id.sub_ids().iter().any(|b| {
                if index.same_lineage(a, b) {
                    ratio > self.config.same_lineage_ratio
                } else {
                    ratio > self.config.ambiguity_ratio
                }
            })
        })
    }
}
