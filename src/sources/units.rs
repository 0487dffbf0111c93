//! Taxonomic-unit (mOTU) label files.
//!
//! Each row is whitespace separated; the first token is the gene and the
//! last token is its label. Tokens in between are ignored.

use super::LineCursor;
use crate::gene::GeneId;
use crate::membership::{ClusterError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A streaming `(gene, label)` reader.
pub struct TaxonomicUnitReader<R: Read> {
    cursor: LineCursor<R>,
}

impl TaxonomicUnitReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> TaxonomicUnitReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: LineCursor::new(reader),
        }
    }

    pub fn read_label(&mut self) -> Result<Option<(GeneId, String)>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }

        let line = self.cursor.text()?;
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next_back()) {
            (Some(gene), Some(label)) => Ok(Some((GeneId::name(gene), label.to_string()))),
            _ => Err(ClusterError::Parse {
                line: self.cursor.line_number(),
                message: "Expected at least 2 fields (gene ... label)".to_string(),
            }),
        }
    }

    pub fn labels(self) -> TaxonomicUnitIter<R> {
        TaxonomicUnitIter { reader: self }
    }
}

/// Iterator over `(gene, label)` pairs.
pub struct TaxonomicUnitIter<R: Read> {
    reader: TaxonomicUnitReader<R>,
}

impl<R: Read> Iterator for TaxonomicUnitIter<R> {
    type Item = Result<(GeneId, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_label().transpose()
    }
}
