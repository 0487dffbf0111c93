//! Line-oriented annotation and profile tables.
//!
//! Each line is an opaque payload copied verbatim. The join key is either
//! the first whitespace-delimited field or the 1-based line number counted
//! after the optional header line.
//!
//! Lines are kept as raw bytes, `\r` included, so any encoding and line
//! ending is written back unchanged.

use super::{fields, key_text, LineCursor};
use crate::gene::{GeneId, KeyMode};
use crate::membership::{ClusterError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A streaming reader of `(key, line)` records.
pub struct LineRecordReader<R: Read> {
    cursor: LineCursor<R>,
    key_mode: KeyMode,
    skip_header: bool,
    header: Option<Vec<u8>>,
    records_read: u64,
}

impl LineRecordReader<File> {
    /// Open a table from a path.
    pub fn from_path<P: AsRef<Path>>(path: P, key_mode: KeyMode) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file, key_mode))
    }
}

impl<R: Read> LineRecordReader<R> {
    pub fn new(reader: R, key_mode: KeyMode) -> Self {
        Self {
            cursor: LineCursor::new(reader),
            key_mode,
            skip_header: false,
            header: None,
            records_read: 0,
        }
    }

    /// Treat the first line as a header: it is never joined.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.skip_header = has_header;
        self
    }

    /// The header line, once it has been consumed.
    pub fn header(&self) -> Option<&[u8]> {
        self.header.as_deref()
    }

    /// Read the next `(key, line)` record.
    pub fn read_record(&mut self) -> Result<Option<(GeneId, Vec<u8>)>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }
        if self.skip_header && self.cursor.line_number() == 1 {
            self.header = Some(self.cursor.raw().to_vec());
            if !self.cursor.advance()? {
                return Ok(None);
            }
        }

        self.records_read += 1;
        let line = self.cursor.raw();
        let key = match self.key_mode {
            KeyMode::Position => GeneId::Ordinal(self.records_read),
            KeyMode::Name => match fields(line).next() {
                Some(name) => GeneId::Name(key_text(name)),
                None => {
                    return Err(ClusterError::Parse {
                        line: self.cursor.line_number(),
                        message: "Missing gene name in first column".to_string(),
                    })
                }
            },
        };

        Ok(Some((key, line.to_vec())))
    }

    /// Get an iterator over all records.
    pub fn records(self) -> LineRecordIter<R> {
        LineRecordIter { reader: self }
    }
}

/// Iterator over `(key, line)` records.
pub struct LineRecordIter<R: Read> {
    reader: LineRecordReader<R>,
}

impl<R: Read> Iterator for LineRecordIter<R> {
    type Item = Result<(GeneId, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}
