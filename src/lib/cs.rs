//! Short-form `cs` difference tag tallies.
//!
//! A short `cs` string is a run of elements: `:N` (N identical bases), `+seq` (insertion),
//! `-seq` (deletion) and `*xy` (reference base `x` substituted by `y`). The long form (`=ACGT`)
//! and splice elements (`~`) are not produced for oligo alignments and are rejected.

use crate::errors::{MpraError, Result};

/// Value of the `cs` column when the tag is absent.
pub const MISSING_CS: &str = "*";

/// Counts accumulated over the elements of one `cs` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CsTally {
    /// Substituted bases: each reference/alternate letter pair counts as one.
    pub mismatches: f64,
    /// Inserted plus deleted bases.
    pub indels: u64,
}

impl CsTally {
    /// Parses a short-form `cs` tag value (without the `cs:Z:` prefix).
    ///
    /// # Errors
    ///
    /// Returns [`MpraError::InvalidCsTag`] on the first element that is not `:N`, `+seq`,
    /// `-seq` or `*xy`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpramap_lib::cs::CsTally;
    ///
    /// let tally = CsTally::parse(":10*ag:5+tt:3-c:20").unwrap();
    /// assert_eq!(tally.mismatches, 1.0);
    /// assert_eq!(tally.indels, 3);
    /// assert_eq!(CsTally::parse("*").unwrap(), CsTally::default());
    /// ```
    pub fn parse(cs: &str) -> Result<Self> {
        let mut tally = Self::default();
        if cs == MISSING_CS {
            return Ok(tally);
        }

        let bytes = cs.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let body_start = pos + 1;
            let body_len = match bytes[pos] {
                b':' => run_length(&bytes[body_start..], |b| b.is_ascii_digit()),
                b'+' | b'-' | b'*' => run_length(&bytes[body_start..], |b| b.is_ascii_alphabetic()),
                _ => 0,
            };
            if body_len == 0 {
                return Err(MpraError::InvalidCsTag {
                    cs: cs.to_string(),
                    remainder: cs[pos..].to_string(),
                });
            }

            match bytes[pos] {
                b'+' | b'-' => tally.indels += body_len as u64,
                b'*' => tally.mismatches += body_len as f64 / 2.0,
                _ => {}
            }
            pos = body_start + body_len;
        }

        Ok(tally)
    }
}

/// Length of the leading run of `bytes` satisfying `pred`.
fn run_length(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}
