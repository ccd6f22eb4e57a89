//! Memory trace reader.
//!
//! Traces are plain text, one access per line:
//!
//! ```text
//! # comment
//! R 0x1000
//! W 1040
//! ```
//!
//! The operation is `R` or `W` (either case); the address is hexadecimal with
//! an optional `0x` prefix. Blank lines and `#` comments are skipped, and any
//! fields after the address are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::{AccessRecord, AccessType, TraceError};

/// Parses one trace line.
///
/// # Arguments
///
/// * `line` - The raw line text.
/// * `line_number` - 1-based position, used in errors.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines, `Ok(Some(record))` otherwise.
///
/// # Errors
///
/// [`TraceError::InvalidOperation`], [`TraceError::MissingAddress`], or
/// [`TraceError::InvalidAddress`] naming `line_number`.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<AccessRecord>, TraceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let op = fields.next().unwrap_or_default();
    let op: AccessType = op.parse().map_err(|source| TraceError::InvalidOperation {
        line: line_number,
        source,
    })?;

    let text = fields.next().ok_or(TraceError::MissingAddress { line: line_number })?;
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let address = u64::from_str_radix(digits, 16).map_err(|source| TraceError::InvalidAddress {
        line: line_number,
        text: text.to_string(),
        source,
    })?;

    Ok(Some(AccessRecord { address, op }))
}

/// Streaming iterator over the records of a trace.
///
/// Yields `(line_number, record)` pairs in file order, skipping blank and
/// comment lines. A line that is not valid UTF-8 yields
/// [`TraceError::InvalidEncoding`] and reading continues. After an I/O error
/// the iterator is exhausted.
#[derive(Debug)]
pub struct TraceReader<R> {
    input: R,
    buf: Vec<u8>,
    line: usize,
    failed: bool,
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// [`TraceError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps any buffered reader.
    pub const fn new(input: R) -> Self {
        Self {
            input,
            buf: Vec::new(),
            line: 0,
            failed: false,
        }
    }

    /// Number of lines consumed so far.
    pub const fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<(usize, AccessRecord), TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed {
            self.buf.clear();
            match self.input.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    let text = match std::str::from_utf8(&self.buf) {
                        Ok(text) => text,
                        Err(source) => {
                            return Some(Err(TraceError::InvalidEncoding {
                                line: self.line,
                                source,
                            }));
                        }
                    };
                    match parse_line(text, self.line) {
                        Ok(Some(record)) => return Some(Ok((self.line, record))),
                        Ok(None) => {}
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(TraceError::Io(e)));
                }
            }
        }
        None
    }
}
