//! Reader and writer construction for the line-oriented stage formats.
//!
//! Files are opened through [`fgoxide::io::Io`], which decompresses and compresses
//! transparently when the path ends in `.gz`. The path `-` (or `/dev/stdin` when reading)
//! selects the standard streams so stages can be chained with pipes.

use anyhow::{Context, Result};
use fgoxide::io::Io;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Buffer size for readers and writers.
pub const BUFFER_SIZE: usize = 1024 * 1024;

/// gzip compression level used for `.gz` outputs.
const GZIP_LEVEL: u32 = 5;

/// Check if a path refers to stdin.
///
/// Returns true if the path is "-" or "/dev/stdin".
///
/// # Example
/// ```
/// use mpramap_lib::io::is_stdin_path;
/// use std::path::Path;
///
/// assert!(is_stdin_path(Path::new("-")));
/// assert!(is_stdin_path(Path::new("/dev/stdin")));
/// assert!(!is_stdin_path(Path::new("scored.tsv")));
/// ```
pub fn is_stdin_path<P: AsRef<Path>>(path: P) -> bool {
    let path_str = path.as_ref().to_string_lossy();
    path_str == "-" || path_str == "/dev/stdin"
}

/// Check if a path refers to stdout.
///
/// Returns true if the path is "-" or "/dev/stdout".
pub fn is_stdout_path<P: AsRef<Path>>(path: P) -> bool {
    let path_str = path.as_ref().to_string_lossy();
    path_str == "-" || path_str == "/dev/stdout"
}

/// Open a buffered reader over a file, a gzipped file, or stdin.
///
/// # Errors
/// Returns an error if the file cannot be opened
pub fn open_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead + Send>> {
    let path_ref = path.as_ref();
    if is_stdin_path(path_ref) {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, std::io::stdin())));
    }
    let reader = Io::new(GZIP_LEVEL, BUFFER_SIZE)
        .new_reader(path_ref)
        .with_context(|| format!("Failed to open input: {}", path_ref.display()))?;
    Ok(reader)
}

/// Open a buffered writer to a file, a gzipped file, or stdout.
///
/// # Errors
/// Returns an error if the file cannot be created
pub fn open_writer<P: AsRef<Path>>(path: P) -> Result<Box<dyn Write + Send>> {
    let path_ref = path.as_ref();
    if is_stdout_path(path_ref) {
        return Ok(Box::new(BufWriter::with_capacity(BUFFER_SIZE, std::io::stdout())));
    }
    let writer = Io::new(GZIP_LEVEL, BUFFER_SIZE)
        .new_writer(path_ref)
        .with_context(|| format!("Failed to create output: {}", path_ref.display()))?;
    Ok(Box::new(writer))
}
