//! Streaming multi-FASTA reader.
//!
//! Only header/sequence segmentation is done: a `>` line opens a record and
//! the following lines, right-trimmed, are concatenated until the next `>`.
//! Lines before the first header are ignored. Bytes are never decoded.

use crate::gene::{GeneId, KeyMode};
use crate::membership::Result;
use crate::sources::LineCursor;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One FASTA record. The header keeps its leading `>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: Vec<u8>,
    pub sequence: Vec<u8>,
}

impl FastaRecord {
    pub fn new(header: impl Into<Vec<u8>>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// Sequence name: first whitespace token of the header, without `>`.
    pub fn name(&self) -> Cow<'_, str> {
        let header = self.header.strip_prefix(b">").unwrap_or(&self.header[..]);
        let token = header
            .split(u8::is_ascii_whitespace)
            .find(|t| !t.is_empty())
            .unwrap_or_default();
        String::from_utf8_lossy(token)
    }
}

/// A streaming FASTA reader.
pub struct FastaReader<R: Read> {
    cursor: LineCursor<R>,
    pending_header: Option<Vec<u8>>,
    records_read: u64,
}

impl FastaReader<File> {
    /// Open a FASTA file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: LineCursor::with_capacity(1024 * 1024, reader),
            pending_header: None,
            records_read: 0,
        }
    }

    /// Read the next record.
    pub fn read_record(&mut self) -> Result<Option<FastaRecord>> {
        let mut sequence = Vec::new();

        loop {
            if !self.cursor.advance()? {
                return Ok(self.pending_header.take().map(|header| {
                    self.records_read += 1;
                    FastaRecord { header, sequence }
                }));
            }

            let line = self.cursor.raw().trim_ascii_end();
            if line.starts_with(b">") {
                let next = line.to_vec();
                if let Some(header) = self.pending_header.replace(next) {
                    self.records_read += 1;
                    return Ok(Some(FastaRecord { header, sequence }));
                }
            } else if self.pending_header.is_some() {
                sequence.extend_from_slice(line);
            }
        }
    }

    /// Number of records returned so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Iterate records together with their join key.
    pub fn keyed(self, key_mode: KeyMode) -> KeyedFastaIter<R> {
        KeyedFastaIter {
            reader: self,
            key_mode,
        }
    }

    /// Iterate over all records.
    pub fn records(self) -> FastaRecordIter<R> {
        FastaRecordIter { reader: self }
    }
}

/// Iterator over FASTA records.
pub struct FastaRecordIter<R: Read> {
    reader: FastaReader<R>,
}

impl<R: Read> Iterator for FastaRecordIter<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Iterator over `(key, record)`, keyed by 1-based record number or by name.
pub struct KeyedFastaIter<R: Read> {
    reader: FastaReader<R>,
    key_mode: KeyMode,
}

impl<R: Read> Iterator for KeyedFastaIter<R> {
    type Item = Result<(GeneId, FastaRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.reader.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };
        let key = match self.key_mode {
            KeyMode::Position => GeneId::Ordinal(self.reader.records_read()),
            KeyMode::Name => GeneId::Name(record.name().into_owned()),
        };
        Some(Ok((key, record)))
    }
}

/// Parse all records from a string (useful for testing).
pub fn parse_fasta(content: &str) -> Result<Vec<FastaRecord>> {
    FastaReader::new(content.as_bytes()).records().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_records() {
        let content = ">g1 desc\nACGT\nTT\n>g2\nGG\n";
        let records = parse_fasta(content).unwrap();

        assert_eq!(
            records,
            vec![
                FastaRecord::new(">g1 desc", "ACGTTT"),
                FastaRecord::new(">g2", "GG")
            ]
        );
        assert_eq!(records[0].name(), "g1");
    }

    #[test]
    fn test_trailing_whitespace_and_crlf() {
        let records = parse_fasta(">g1  \r\nAC \r\nGT\r\n").unwrap();
        assert_eq!(records, vec![FastaRecord::new(">g1", "ACGT")]);
    }

    #[test]
    fn test_leading_lines_ignored() {
        let records = parse_fasta("junk\n\n>g1\nA\n").unwrap();
        assert_eq!(records, vec![FastaRecord::new(">g1", "A")]);
    }

    #[test]
    fn test_empty_sequence_and_no_final_newline() {
        let records = parse_fasta(">g1\n>g2\nAC").unwrap();
        assert_eq!(
            records,
            vec![FastaRecord::new(">g1", ""), FastaRecord::new(">g2", "AC")]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_fasta("").unwrap().is_empty());
    }

    #[test]
    fn test_keyed_by_position_and_name() {
        let content = ">alpha x\nA\n>beta\nC\n";

        let by_position: Vec<_> = FastaReader::new(content.as_bytes())
            .keyed(KeyMode::Position)
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(by_position, vec![GeneId::ordinal(1), GeneId::ordinal(2)]);

        let by_name: Vec<_> = FastaReader::new(content.as_bytes())
            .keyed(KeyMode::Name)
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(by_name, vec![GeneId::name("alpha"), GeneId::name("beta")]);
    }

    #[test]
    fn test_non_utf8_bytes_kept() {
        let records = FastaReader::new(&b">g\xe91 d\xe9sc\nAC\xff\n"[..])
            .records()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(records[0].header, b">g\xe91 d\xe9sc".to_vec());
        assert_eq!(records[0].sequence, b"AC\xff".to_vec());
        assert_eq!(records[0].name(), "g\u{fffd}1");
    }
}
