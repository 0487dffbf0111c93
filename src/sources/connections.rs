//! Pairwise gene connection files: `<geneA> <geneB> <weight>` per line.

use super::{parse_u64_fast, LineCursor};
use crate::gene::{GeneId, KeyMode};
use crate::membership::{ClusterError, Result};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An undirected weighted edge between two genes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub gene_a: GeneId,
    pub gene_b: GeneId,
    pub weight: u64,
}

impl Connection {
    pub fn new(gene_a: GeneId, gene_b: GeneId, weight: u64) -> Self {
        Self {
            gene_a,
            gene_b,
            weight,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.gene_a, self.gene_b, self.weight)
    }
}

/// A streaming connection file reader.
pub struct ConnectionReader<R: Read> {
    cursor: LineCursor<R>,
    key_mode: KeyMode,
}

impl ConnectionReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, key_mode: KeyMode) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file, key_mode))
    }
}

impl<R: Read> ConnectionReader<R> {
    pub fn new(reader: R, key_mode: KeyMode) -> Self {
        Self {
            cursor: LineCursor::new(reader),
            key_mode,
        }
    }

    /// Read the next connection.
    pub fn read_connection(&mut self) -> Result<Option<Connection>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }
        self.parse_line().map(Some)
    }

    fn parse_line(&self) -> Result<Connection> {
        let line = self.cursor.text()?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(self.error(format!(
                "Expected 3 fields (geneA geneB weight), got {}",
                fields.len()
            )));
        }

        let gene_a = self.parse_gene(fields[0])?;
        let gene_b = self.parse_gene(fields[1])?;
        let weight = parse_u64_fast(fields[2].as_bytes())
            .ok_or_else(|| self.error(format!("Invalid connection weight: '{}'", fields[2])))?;

        Ok(Connection::new(gene_a, gene_b, weight))
    }

    fn parse_gene(&self, token: &str) -> Result<GeneId> {
        self.key_mode
            .parse_token(token)
            .ok_or_else(|| self.error(format!("Invalid gene position: '{}'", token)))
    }

    fn error(&self, message: String) -> ClusterError {
        ClusterError::Parse {
            line: self.cursor.line_number(),
            message,
        }
    }

    pub fn connections(self) -> ConnectionIter<R> {
        ConnectionIter { reader: self }
    }
}

/// Iterator over connections.
pub struct ConnectionIter<R: Read> {
    reader: ConnectionReader<R>,
}

impl<R: Read> Iterator for ConnectionIter<R> {
    type Item = Result<Connection>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_connection().transpose()
    }
}

/// Parse connections from a string (useful for testing).
pub fn parse_connections(content: &str, key_mode: KeyMode) -> Result<Vec<Connection>> {
    ConnectionReader::new(content.as_bytes(), key_mode)
        .connections()
        .collect()
}
