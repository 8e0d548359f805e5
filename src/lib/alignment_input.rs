//! Alignment sources for the scorer.
//!
//! Two sources produce [`AlignmentLine`]s: a tolerant SAM text reader, which skips lines with
//! too few columns instead of aborting, and a BAM reader built on noodles. Both read the header
//! up front so the [`ReferenceIndex`] is complete before the first record is scored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use noodles::bam;
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;

use crate::errors::MpraError;
use crate::io::{BUFFER_SIZE, is_stdin_path, open_reader};
use crate::record::NOT_AVAILABLE;
use crate::scorer::{AlignmentLine, ReferenceIndex};

/// Mandatory columns of a SAM alignment line.
pub const SAM_MANDATORY_COLUMNS: usize = 11;

const CS_TAG_PREFIX: &str = "cs:Z:";

/// A stream of alignments with a known reference index.
pub trait AlignmentSource: Iterator<Item = Result<AlignmentLine>> {
    /// Reference lengths from the header.
    fn references(&self) -> &ReferenceIndex;

    /// Number of input lines skipped because they had too few columns.
    fn malformed_lines(&self) -> u64;
}

/// Opens a SAM or BAM alignment source.
///
/// Paths ending in `.bam` are read as BAM; anything else, including stdin (`-`), as SAM text
/// (optionally gzipped).
///
/// # Errors
/// Returns an error if the input cannot be opened or its header cannot be read
pub fn open_alignment_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn AlignmentSource>> {
    let path_ref = path.as_ref();
    let is_bam = !is_stdin_path(path_ref)
        && path_ref.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("bam"));

    if is_bam {
        debug!("Reading {} as BAM", path_ref.display());
        Ok(Box::new(BamAlignmentReader::from_path(path_ref)?))
    } else {
        debug!("Reading {} as SAM text", path_ref.display());
        Ok(Box::new(SamTextReader::new(open_reader(path_ref)?)?))
    }
}

/// Reads SAM text, indexing `@SQ` header lines and tokenizing alignment lines.
pub struct SamTextReader<R: BufRead> {
    reader: R,
    references: ReferenceIndex,
    pending: Option<String>,
    malformed: u64,
    buffer: String,
}

impl<R: BufRead> SamTextReader<R> {
    /// Creates a reader, consuming the header.
    ///
    /// # Errors
    /// Returns an error if reading the header fails
    pub fn new(mut reader: R) -> Result<Self> {
        let mut references = ReferenceIndex::new();
        let mut pending = None;
        let mut buffer = String::new();

        loop {
            buffer.clear();
            if reader.read_line(&mut buffer).context("Failed to read SAM header")? == 0 {
                break;
            }
            let line = buffer.trim_end_matches(['\r', '\n']);
            if line.starts_with('@') {
                references.add_header_line(line);
            } else {
                pending = Some(line.to_string());
                break;
            }
        }

        debug!("Indexed {} reference sequences", references.len());
        Ok(Self { reader, references, pending, malformed: 0, buffer })
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer).context("Failed to read SAM record")? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buffer.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Tokenizes one SAM alignment line.
///
/// Returns `Ok(None)` when the line has fewer than the 11 mandatory columns.
///
/// # Errors
/// Returns a parse error if the flag or position is not numeric
pub fn parse_sam_line(line: &str) -> crate::errors::Result<Option<AlignmentLine>> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < SAM_MANDATORY_COLUMNS {
        return Ok(None);
    }

    let flags = cols[1].parse::<u16>().map_err(|_| MpraError::invalid_number("flag", cols[1]))?;
    let position =
        cols[3].parse::<i64>().map_err(|_| MpraError::invalid_number("position", cols[3]))?;
    let cs = cols[SAM_MANDATORY_COLUMNS..]
        .iter()
        .find_map(|field| field.strip_prefix(CS_TAG_PREFIX))
        .map(str::to_string);

    Ok(Some(AlignmentLine {
        query_name: cols[0].to_string(),
        flags,
        reference: cols[2].to_string(),
        position,
        mapping_quality: cols[4].to_string(),
        cigar: cols[5].to_string(),
        sequence: cols[9].to_string(),
        cs,
    }))
}

impl<R: BufRead> Iterator for SamTextReader<R> {
    type Item = Result<AlignmentLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            };
            if line.is_empty() || line.starts_with('@') {
                continue;
            }
            match parse_sam_line(&line) {
                Ok(Some(alignment)) => return Some(Ok(alignment)),
                Ok(None) => {
                    debug!("Skipping SAM line with too few columns: {line}");
                    self.malformed += 1;
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

impl<R: BufRead> AlignmentSource for SamTextReader<R> {
    fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    fn malformed_lines(&self) -> u64 {
        self.malformed
    }
}

/// Reads BAM records with noodles and converts them to [`AlignmentLine`]s.
pub struct BamAlignmentReader {
    reader: bam::io::Reader<noodles::bgzf::io::Reader<BufReader<File>>>,
    header: Header,
    references: ReferenceIndex,
    record: RecordBuf,
}

impl BamAlignmentReader {
    /// Opens a BAM file and reads its header.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the header cannot be read
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input BAM: {}", path.display()))?;
        let mut reader = bam::io::Reader::new(BufReader::with_capacity(BUFFER_SIZE, file));
        let header = reader
            .read_header()
            .with_context(|| format!("Failed to read header from: {}", path.display()))?;

        let mut references = ReferenceIndex::new();
        for (name, map) in header.reference_sequences() {
            references.insert(name.to_string(), map.length().get() as u64);
        }

        Ok(Self { reader, header, references, record: RecordBuf::default() })
    }
}

/// Renders a noodles CIGAR as text, `*` when empty.
fn cigar_string(record: &RecordBuf) -> String {
    use std::fmt::Write;

    let ops = record.cigar().as_ref();
    if ops.is_empty() {
        return "*".to_string();
    }
    ops.iter().fold(String::new(), |mut acc, op| {
        let c = match op.kind() {
            Kind::Match => 'M',
            Kind::Insertion => 'I',
            Kind::Deletion => 'D',
            Kind::SoftClip => 'S',
            Kind::HardClip => 'H',
            Kind::Skip => 'N',
            Kind::Pad => 'P',
            Kind::SequenceMatch => '=',
            Kind::SequenceMismatch => 'X',
        };
        let _ = write!(acc, "{}{c}", op.len());
        acc
    })
}

/// Converts a BAM record to an [`AlignmentLine`].
fn to_alignment_line(record: &RecordBuf, header: &Header) -> AlignmentLine {
    let reference = record
        .reference_sequence_id()
        .and_then(|id| header.reference_sequences().get_index(id))
        .map_or_else(|| "*".to_string(), |(name, _)| name.to_string());
    let sequence = record.sequence().as_ref();
    let cs = match record.data().get(&Tag::new(b'c', b's')) {
        Some(Value::String(s)) => Some(s.to_string()),
        _ => None,
    };

    AlignmentLine {
        query_name: record.name().map_or_else(|| "*".to_string(), ToString::to_string),
        flags: u16::from(record.flags()),
        reference,
        position: record.alignment_start().map_or(0, |p| usize::from(p) as i64),
        mapping_quality: record
            .mapping_quality()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |mq| mq.get().to_string()),
        cigar: cigar_string(record),
        sequence: if sequence.is_empty() {
            "*".to_string()
        } else {
            String::from_utf8_lossy(sequence).into_owned()
        },
        cs,
    }
}

impl Iterator for BamAlignmentReader {
    type Item = Result<AlignmentLine>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record_buf(&self.header, &mut self.record) {
            Ok(0) => None,
            Ok(_) => Some(Ok(to_alignment_line(&self.record, &self.header))),
            Err(e) => Some(Err(anyhow::Error::new(e).context("Failed to read BAM record"))),
        }
    }
}

impl AlignmentSource for BamAlignmentReader {
    fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    fn malformed_lines(&self) -> u64 {
        0
    }
}
