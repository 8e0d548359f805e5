//! Lineage index for saturation-mutagenesis designs.
//!
//! Every designed oligo id maps to the id of the reference sequence it was mutated from. Two
//! candidates whose sub-identifiers share a parent are variants of the same element, and the
//! resolver applies a stricter ambiguity threshold to them.

use std::path::Path;

use ahash::AHashMap;
use fgoxide::io::DelimFile;
use log::info;
use serde::Deserialize;

use crate::candidate::UNMAPPED_PLACEHOLDER;
use crate::errors::{MpraError, Result};

/// One row of an oligo attributes file; other columns are ignored.
#[derive(Debug, Deserialize)]
struct LineageRow {
    #[serde(rename = "ID")]
    id: String,
    sat_ref_parent: String,
}

/// Oligo id to parent lineage id.
#[derive(Debug, Clone, Default)]
pub struct LineageIndex {
    parents: AHashMap<String, String>,
}

impl LineageIndex {
    /// Loads an attributes TSV with `ID` and `sat_ref_parent` header columns.
    ///
    /// # Errors
    ///
    /// Returns [`MpraError::InvalidFileFormat`] if the file is missing, unreadable, or lacks a
    /// required column.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let rows: Vec<LineageRow> =
            DelimFile::default().read_tsv(&path_ref).map_err(|e| MpraError::InvalidFileFormat {
                file_type: "lineage index".to_string(),
                path: path_ref.display().to_string(),
                reason: e.to_string(),
            })?;

        let index: Self = rows.into_iter().map(|row| (row.id, row.sat_ref_parent)).collect();
        info!("Loaded {} oligo lineages from {}", index.len(), path_ref.display());
        Ok(index)
    }

    /// The parent lineage of an oligo id; `None` for the unmapped placeholder or an unknown id.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpramap_lib::lineage::LineageIndex;
    ///
    /// let index: LineageIndex =
    ///     [("tile_3_mut1", "tile_3"), ("tile_3", "tile_3")].into_iter().collect();
    /// assert_eq!(index.lineage_of("tile_3_mut1"), Some("tile_3"));
    /// assert_eq!(index.lineage_of("*"), None);
    /// assert_eq!(index.lineage_of("tile_9"), None);
    /// ```
    #[must_use]
    pub fn lineage_of(&self, id: &str) -> Option<&str> {
        if id == UNMAPPED_PLACEHOLDER {
            return None;
        }
        self.parents.get(id).map(String::as_str)
    }

    /// True if both ids are mapped and share a parent lineage.
    #[must_use]
    pub fn same_lineage(&self, a: &str, b: &str) -> bool {
        match (self.lineage_of(a), self.lineage_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Number of indexed oligo ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// True if no oligo id is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LineageIndex {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { parents: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
