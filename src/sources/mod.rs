//! Readers for the secondary per-gene sources joined against a membership
//! index.
//!
//! Every reader is forward-only and yields `Result` items, so a malformed
//! line aborts whatever pass consumes it.

pub mod connections;
pub mod lines;
pub mod tables;
pub mod units;

pub use connections::{Connection, ConnectionReader};
pub use lines::LineRecordReader;
pub use tables::{FunctionalAnnotationReader, TaxonomicAnnotationReader};
pub use units::TaxonomicUnitReader;

use crate::membership::{ClusterError, Result};
use std::io::{BufRead, BufReader, Read};

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty, contains non-digit characters or
/// overflows.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Whitespace-separated fields of a raw line.
#[inline]
pub(crate) fn fields(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(u8::is_ascii_whitespace).filter(|f| !f.is_empty())
}

/// Join key text of a raw field.
///
/// Invalid UTF-8 sequences become U+FFFD.
#[inline]
pub(crate) fn key_text(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Line-at-a-time cursor shared by the text readers.
///
/// Lines are read as raw bytes; only readers that need text decode them.
pub(crate) struct LineCursor<R: Read> {
    reader: BufReader<R>,
    buffer: Vec<u8>,
    line_number: usize,
}

impl<R: Read> LineCursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self::with_capacity(8 * 1024, reader)
    }

    pub(crate) fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            buffer: Vec::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Move to the next line; returns false at end of input.
    pub(crate) fn advance(&mut self) -> Result<bool> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    /// Current line without its `\n`. A `\r` before it is kept.
    #[inline]
    pub(crate) fn raw(&self) -> &[u8] {
        self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer[..])
    }

    /// Current line as text, without `\n` or `\r\n`.
    pub(crate) fn text(&self) -> Result<&str> {
        let line = self.raw();
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        std::str::from_utf8(line).map_err(|e| ClusterError::Parse {
            line: self.line_number,
            message: format!("Invalid UTF-8 at byte {}", e.valid_up_to()),
        })
    }

    /// 1-based number of the current line.
    #[inline]
    pub(crate) fn line_number(&self) -> usize {
        self.line_number
    }
}
