//! Gene catalog annotation tables used to build the combined annotation
//! table.
//!
//! Values are kept as raw bytes without the line terminator.

use super::{fields, key_text, LineCursor};
use crate::gene::GeneId;
use crate::membership::{ClusterError, Result};
use memchr::{memchr, memrchr};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Taxonomic annotation table, tab separated.
///
/// The key is the first column; the value is every column between the
/// first and the last one, re-joined with tabs. The last column is not
/// carried over.
pub struct TaxonomicAnnotationReader<R: Read> {
    cursor: LineCursor<R>,
}

impl TaxonomicAnnotationReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> TaxonomicAnnotationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: LineCursor::new(reader),
        }
    }

    pub fn read_annotation(&mut self) -> Result<Option<(GeneId, Vec<u8>)>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }

        let raw = self.cursor.raw();
        let line = raw.strip_suffix(b"\r").unwrap_or(raw);
        let first_tab = memchr(b'\t', line);
        let gene = &line[..first_tab.unwrap_or(line.len())];
        if gene.is_empty() {
            return Err(ClusterError::Parse {
                line: self.cursor.line_number(),
                message: "Missing gene name in first column".to_string(),
            });
        }

        let value: &[u8] = match (first_tab, memrchr(b'\t', line)) {
            (Some(first), Some(last)) if last > first => &line[first + 1..last],
            _ => b"",
        };

        Ok(Some((GeneId::Name(key_text(gene)), value.to_vec())))
    }

    pub fn annotations(self) -> AnnotationIter<Self> {
        AnnotationIter { reader: self }
    }
}

/// Functional annotation table, whitespace separated.
///
/// The key is the second column and the annotation the third; further
/// columns are ignored.
pub struct FunctionalAnnotationReader<R: Read> {
    cursor: LineCursor<R>,
}

impl FunctionalAnnotationReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> FunctionalAnnotationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: LineCursor::new(reader),
        }
    }

    pub fn read_annotation(&mut self) -> Result<Option<(GeneId, Vec<u8>)>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }

        let mut columns = fields(self.cursor.raw()).skip(1);
        match (columns.next(), columns.next()) {
            (Some(gene), Some(annotation)) => {
                Ok(Some((GeneId::Name(key_text(gene)), annotation.to_vec())))
            }
            _ => Err(ClusterError::Parse {
                line: self.cursor.line_number(),
                message: "Expected at least 3 fields (id gene annotation)".to_string(),
            }),
        }
    }

    pub fn annotations(self) -> AnnotationIter<Self> {
        AnnotationIter { reader: self }
    }
}

/// Readers yielding one `(gene, annotation)` per line.
pub trait AnnotationSource {
    fn next_annotation(&mut self) -> Result<Option<(GeneId, Vec<u8>)>>;
}

impl<R: Read> AnnotationSource for TaxonomicAnnotationReader<R> {
    fn next_annotation(&mut self) -> Result<Option<(GeneId, Vec<u8>)>> {
        self.read_annotation()
    }
}

impl<R: Read> AnnotationSource for FunctionalAnnotationReader<R> {
    fn next_annotation(&mut self) -> Result<Option<(GeneId, Vec<u8>)>> {
        self.read_annotation()
    }
}

/// Iterator adapter over any [`AnnotationSource`].
pub struct AnnotationIter<S> {
    reader: S,
}

impl<S: AnnotationSource> Iterator for AnnotationIter<S> {
    type Item = Result<(GeneId, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_annotation().transpose()
    }
}
