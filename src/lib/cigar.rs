//! CIGAR string tallies used for alignment scoring.
//!
//! Only the operations an oligo aligner emits with `--eqx` are accepted: `M`, `=`, `X`, `I`,
//! `D`, `S` and `H`. Anything else (including `N` and `P`) is a parse error.

use crate::errors::{MpraError, Result};

/// Counts accumulated over the operations of one CIGAR string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CigarTally {
    /// Bases in `M` and `=` operations.
    pub matches: u64,
    /// Bases in `I`, `D`, `S` and `H` operations.
    pub mismatches: u64,
    /// Bases in `X` operations.
    pub substitutions: u64,
    /// Reference bases covered: `M`, `=`, `D` and `X`.
    pub aligned_length: u64,
}

impl CigarTally {
    /// Parses a CIGAR string such as `40M2I8M` into its tallies.
    ///
    /// `*` (CIGAR unavailable) yields an all-zero tally.
    ///
    /// # Errors
    ///
    /// Returns [`MpraError::InvalidCigar`] for an unknown operation code, an operation without
    /// a length, trailing digits without an operation, or lengths whose sum overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpramap_lib::cigar::CigarTally;
    ///
    /// let tally = CigarTally::parse("5S40=1X2D").unwrap();
    /// assert_eq!(tally.matches, 40);
    /// assert_eq!(tally.mismatches, 7);
    /// assert_eq!(tally.substitutions, 1);
    /// assert_eq!(tally.aligned_length, 43);
    /// assert!(CigarTally::parse("10M5N10M").is_err());
    /// ```
    pub fn parse(cigar: &str) -> Result<Self> {
        let mut tally = Self::default();
        if cigar == "*" {
            return Ok(tally);
        }

        let invalid = |reason: String| MpraError::InvalidCigar { cigar: cigar.to_string(), reason };

        let mut len: Option<u64> = None;
        for c in cigar.chars() {
            if let Some(digit) = c.to_digit(10) {
                let current = len.unwrap_or(0);
                len = Some(
                    current
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(digit)))
                        .ok_or_else(|| invalid("operation length overflows".to_string()))?,
                );
                continue;
            }

            let n = len.take().ok_or_else(|| invalid(format!("operation '{c}' has no length")))?;
            let (counter, consumes_reference) = match c {
                'M' | '=' => (&mut tally.matches, true),
                'I' | 'S' | 'H' => (&mut tally.mismatches, false),
                'D' => (&mut tally.mismatches, true),
                'X' => (&mut tally.substitutions, true),
                other => return Err(invalid(format!("unexpected operation '{other}'"))),
            };
            let overflow = || invalid("operation lengths overflow".to_string());
            *counter = counter.checked_add(n).ok_or_else(overflow)?;
            if consumes_reference {
                tally.aligned_length = tally.aligned_length.checked_add(n).ok_or_else(overflow)?;
            }
        }

        if len.is_some() {
            return Err(invalid("trailing length without an operation".to_string()));
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use rstest::rstest;

    #[rstest]
    #[case("50M", 50, 0, 0, 50)]
    #[case("40M10S", 40, 10, 0, 40)]
    #[case("5H45=", 45, 5, 0, 45)]
    #[case("20=2I28=", 48, 2, 0, 48)]
    #[case("20=3D30=", 50, 3, 0, 53)]
    #[case("24=1X25=", 49, 0, 1, 50)]
    #[case("2S10=1X3I4D8=2S", 18, 11, 1, 23)]
    #[case("*", 0, 0, 0, 0)]
    #[case("", 0, 0, 0, 0)]
    fn test_parse_cigar(
        #[case] cigar: &str,
        #[case] matches: u64,
        #[case] mismatches: u64,
        #[case] substitutions: u64,
        #[case] aligned_length: u64,
    ) {
        let tally = CigarTally::parse(cigar).unwrap();
        assert_eq!(tally, CigarTally { matches, mismatches, substitutions, aligned_length });
    }

    #[rstest]
    #[case("10M5N10M", "unexpected operation 'N'")]
    #[case("10M2P", "unexpected operation 'P'")]
    #[case("M10", "has no length")]
    #[case("10M5", "trailing length")]
    #[case("10Q", "unexpected operation 'Q'")]
    #[case("18446744073709551615M1M", "operation lengths overflow")]
    #[case("18446744073709551615S1D", "operation lengths overflow")]
    #[case("99999999999999999999M", "operation length overflows")]
    fn test_parse_cigar_errors(#[case] cigar: &str, #[case] expected: &str) {
        let err = CigarTally::parse(cigar).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[test]
    fn test_aligned_length_is_sum_of_reference_consuming_ops() {
        let ops = [(3, 'S'), (12, 'M'), (1, 'I'), (2, 'D'), (7, '='), (1, 'X'), (4, 'H')];
        let cigar: String = ops.iter().map(|(n, op)| format!("{n}{op}")).collect();
        let tally = CigarTally::parse(&cigar).unwrap();

        let expected_aligned: u64 =
            ops.iter().filter(|(_, op)| "M=DX".contains(*op)).map(|(n, _)| *n).sum();
        let expected_mismatch: u64 =
            ops.iter().filter(|(_, op)| "IDSH".contains(*op)).map(|(n, _)| *n).sum();
        assert_eq!(tally.aligned_length, expected_aligned);
        assert_eq!(tally.mismatches, expected_mismatch);
    }
}
