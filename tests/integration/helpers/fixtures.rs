//! Input fixtures: SAM text, BAM files and grouped lines.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use bstr::BString;
use noodles::bam;
use noodles::core::Position;
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::cigar::op::{Kind, Op};
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::{Cigar, RecordBuf, Sequence};
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::ReferenceSequence;

/// Length of every fixture oligo.
pub const OLIGO_LENGTH: usize = 50;

/// One BAM alignment: query name, flags, reference index, CIGAR and optional cs tag.
pub type BamAlignment<'a> = (&'a str, u16, usize, Vec<Op>, Option<&'a str>);

/// A SAM header with the given oligos, all [`OLIGO_LENGTH`] long.
pub fn sam_header(oligos: &[&str]) -> String {
    let mut header = String::from("@HD\tVN:1.6\tSO:queryname\n");
    for oligo in oligos {
        header.push_str(&format!("@SQ\tSN:{oligo}\tLN:{OLIGO_LENGTH}\n"));
    }
    header
}

/// One SAM alignment line with a cs tag.
pub fn sam_line(name: &str, flag: u16, reference: &str, cigar: &str, cs: &str) -> String {
    format!("{name}\t{flag}\t{reference}\t1\t60\t{cigar}\t*\t0\t0\tACGT\t*\tcs:Z:{cs}\n")
}

/// The BC1 example: one perfect OLIGOA alignment and one soft-clipped OLIGOB alignment.
pub fn example_sam() -> String {
    let mut sam = sam_header(&["OLIGOA", "OLIGOB"]);
    sam.push_str(&sam_line("BC1#OLIGOA", 0, "OLIGOA", "50M", ":50"));
    sam.push_str(&sam_line("BC1#OLIGOB", 0, "OLIGOB", "40M10S", ":40"));
    sam
}

/// Scored line of the perfect BC1 alignment to OLIGOA.
pub const EXAMPLE_SCORED_A: &str =
    "BC1\tOLIGOA\t1\tOLIGOA\tOLIGOA\t60\t50\t50M\t0.000\tACGT\tPASS\t0.000\t:50\t0:50";

/// Scored line of the soft-clipped BC1 alignment to OLIGOB.
pub const EXAMPLE_SCORED_B: &str =
    "BC1\tOLIGOB\t1\tOLIGOB\tOLIGOB\t60\t50\t40M10S\t0.400\tACGT\tFAIL\t0.200\t:40\t0:40";

/// Grouped line of the BC1 example.
pub const EXAMPLE_GROUPED: &str =
    "BC1\tOLIGOA,OLIGOB\t1,1\t2\t1\t0,2\t0.000,0.400\t50M,40M10S\t:50,:40\t0:50,0:40";

/// Writes `content` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Writes a BAM of alignments against oligos of [`OLIGO_LENGTH`].
pub fn write_bam(path: &Path, oligos: &[&str], alignments: &[BamAlignment<'_>]) {
    let mut builder = Header::builder();
    for oligo in oligos {
        builder = builder.add_reference_sequence(
            BString::from(*oligo),
            Map::<ReferenceSequence>::new(NonZeroUsize::new(OLIGO_LENGTH).expect("non-zero")),
        );
    }
    let header = builder.build();

    let mut writer =
        bam::io::Writer::new(fs::File::create(path).expect("Failed to create BAM file"));
    writer.write_header(&header).expect("Failed to write header");

    for (name, flags, reference, ops, cs) in alignments {
        let read_length: usize = ops
            .iter()
            .filter(|op| matches!(op.kind(), Kind::Match | Kind::Insertion | Kind::SoftClip))
            .map(|op| op.len())
            .sum();
        let mut record = RecordBuf::builder()
            .set_name(BString::from(*name))
            .set_flags(Flags::from(*flags))
            .set_reference_sequence_id(*reference)
            .set_alignment_start(Position::try_from(1).expect("valid position"))
            .set_mapping_quality(MappingQuality::new(60).expect("valid mapq"))
            .set_cigar(Cigar::from(ops.clone()))
            .set_sequence(Sequence::from(vec![b'A'; read_length]))
            .build();
        if let Some(cs) = cs {
            record.data_mut().insert(Tag::new(b'c', b's'), Value::from(*cs));
        }
        writer.write_alignment_record(&header, &record).expect("Failed to write record");
    }

    writer.finish(&header).expect("Failed to finish BAM");
}
