//! Composite candidate oligo identifiers.
//!
//! Saturation-mutagenesis designs name a candidate after every tile it represents, e.g.
//! `(tile_3;tile_3_mut12)`. [`CandidateId`] splits such an identifier once into its
//! sub-identifiers so later stages never re-split strings.

use std::fmt;

/// Sub-identifier used by aligners for a read that did not map to any reference.
pub const UNMAPPED_PLACEHOLDER: &str = "*";

/// A candidate oligo identifier with its parsed sub-identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateId {
    raw: String,
    subs: Vec<String>,
}

impl CandidateId {
    /// Parses a candidate identifier.
    ///
    /// Outer parentheses are stripped, the remainder is split on `;` and every piece is trimmed.
    /// A plain identifier yields a single sub-identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpramap_lib::candidate::CandidateId;
    ///
    /// let id = CandidateId::parse("(tile_3; tile_3_mut12)");
    /// assert_eq!(id.sub_ids(), ["tile_3", "tile_3_mut12"]);
    /// assert_eq!(id.to_string(), "(tile_3; tile_3_mut12)");
    /// assert_eq!(CandidateId::parse("OLIGOA").sub_ids(), ["OLIGOA"]);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let inner = raw.trim();
        let inner = inner.strip_prefix('(').unwrap_or(inner);
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        let subs = inner.split(';').map(|s| s.trim().to_string()).collect();
        Self { raw: raw.to_string(), subs }
    }

    /// The identifier exactly as it appeared in the input.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed sub-identifiers, in input order.
    #[must_use]
    pub fn sub_ids(&self) -> &[String] {
        &self.subs
    }

    /// True if the identifier is the unmapped placeholder `*`.
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.raw == UNMAPPED_PLACEHOLDER
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
