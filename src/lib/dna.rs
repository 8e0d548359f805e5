//! DNA sequence utilities.
//!
//! This module provides the reverse complement used to orient reverse-strand alignments.

/// Complements a single DNA base, preserving case.
///
/// Returns the Watson-Crick complement: A<->T, C<->G. `N`/`n` and any other character are
/// returned unchanged.
#[inline]
#[must_use]
pub const fn complement_char(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        _ => base,
    }
}

/// Reverse complements a DNA string.
///
/// Returns the reverse complement of the input string, preserving case.
///
/// # Examples
///
/// ```
/// use mpramap_lib::dna::reverse_complement_str;
///
/// assert_eq!(reverse_complement_str("ACGT"), "ACGT");
/// assert_eq!(reverse_complement_str("AAAN"), "NTTT");
/// assert_eq!(reverse_complement_str("acgt"), "acgt");
/// ```
#[must_use]
pub fn reverse_complement_str(seq: &str) -> String {
    seq.chars().rev().map(complement_char).collect()
}
