//! Streaming membership file parser.
//!
//! A membership file holds one `<cluster> <gene>` pair per line, the two
//! tokens separated by any run of whitespace.

use crate::gene::{ClusterId, GeneId, KeyMode};
use crate::sources::LineCursor;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading inputs or writing cluster outputs.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{}: {reason}", path.display())]
    Path { path: PathBuf, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ClusterError>,
    },
}

impl ClusterError {
    /// Attach the offending input path to an error.
    pub fn in_file<P: AsRef<Path>>(self, path: P) -> Self {
        match self {
            // Path errors already name their file
            err @ ClusterError::Path { .. } => err,
            err => ClusterError::InFile {
                path: path.as_ref().to_path_buf(),
                source: Box::new(err),
            },
        }
    }

    /// Returns true for malformed-input errors, wherever they were raised.
    pub fn is_format_error(&self) -> bool {
        match self {
            ClusterError::Parse { .. } => true,
            ClusterError::InFile { source, .. } => source.is_format_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClusterError>;

/// One `(cluster, gene)` assignment read from a membership file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipPair {
    pub cluster: ClusterId,
    pub gene: GeneId,
}

impl MembershipPair {
    pub fn new(cluster: impl Into<ClusterId>, gene: GeneId) -> Self {
        Self {
            cluster: cluster.into(),
            gene,
        }
    }
}

/// A streaming membership file reader.
pub struct MembershipReader<R: Read> {
    cursor: LineCursor<R>,
    key_mode: KeyMode,
}

impl MembershipReader<File> {
    /// Open a membership file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P, key_mode: KeyMode) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file, key_mode))
    }
}

impl<R: Read> MembershipReader<R> {
    /// Create a new membership reader from any readable source.
    pub fn new(reader: R, key_mode: KeyMode) -> Self {
        Self {
            cursor: LineCursor::new(reader),
            key_mode,
        }
    }

    /// Read the next membership pair.
    pub fn read_pair(&mut self) -> Result<Option<MembershipPair>> {
        if !self.cursor.advance()? {
            return Ok(None);
        }
        self.parse_line().map(Some)
    }

    fn parse_line(&self) -> Result<MembershipPair> {
        let line = self.cursor.text()?;
        let mut tokens = line.split_whitespace();
        let (cluster, gene) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(cluster), Some(gene), None) => (cluster, gene),
            _ => {
                return Err(ClusterError::Parse {
                    line: self.cursor.line_number(),
                    message: format!(
                        "Expected 2 fields (cluster gene), got {}",
                        line.split_whitespace().count()
                    ),
                })
            }
        };

        let gene = self
            .key_mode
            .parse_token(gene)
            .ok_or_else(|| ClusterError::Parse {
                line: self.cursor.line_number(),
                message: format!("Invalid gene position: '{}'", gene),
            })?;

        Ok(MembershipPair::new(cluster, gene))
    }

    /// Get an iterator over all pairs.
    pub fn pairs(self) -> MembershipPairIter<R> {
        MembershipPairIter { reader: self }
    }
}

/// Iterator over membership pairs.
pub struct MembershipPairIter<R: Read> {
    reader: MembershipReader<R>,
}

impl<R: Read> Iterator for MembershipPairIter<R> {
    type Item = Result<MembershipPair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_pair().transpose()
    }
}

/// Parse membership pairs from a string (useful for testing).
pub fn parse_pairs(content: &str, key_mode: KeyMode) -> Result<Vec<MembershipPair>> {
    MembershipReader::new(content.as_bytes(), key_mode)
        .pairs()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_pairs() {
        let content = "c1\tgA\nc1 gB\nc2\t\tgA\n";
        let pairs = parse_pairs(content, KeyMode::Name).unwrap();

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], MembershipPair::new("c1", GeneId::name("gA")));
        assert_eq!(pairs[1], MembershipPair::new("c1", GeneId::name("gB")));
        assert_eq!(pairs[2], MembershipPair::new("c2", GeneId::name("gA")));
    }

    #[test]
    fn test_parse_positional_pairs() {
        let content = "c1\t3\nc2\t10\n";
        let pairs = parse_pairs(content, KeyMode::Position).unwrap();

        assert_eq!(pairs[0].gene, GeneId::ordinal(3));
        assert_eq!(pairs[1].gene, GeneId::ordinal(10));
    }

    #[test]
    fn test_too_many_fields() {
        let err = parse_pairs("c1\tgA\nc1\tgB\textra\n", KeyMode::Name).unwrap_err();
        match err {
            ClusterError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_field_and_blank_lines_rejected() {
        assert!(parse_pairs("c1\n", KeyMode::Name).is_err());
        assert!(parse_pairs("c1\tgA\n\nc2\tgB\n", KeyMode::Name).is_err());
    }

    #[test]
    fn test_non_numeric_position() {
        let err = parse_pairs("c1\tgeneA\n", KeyMode::Position).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("geneA"));
    }

    #[test]
    fn test_in_file_keeps_format_kind() {
        let err = parse_pairs("c1\n", KeyMode::Name)
            .unwrap_err()
            .in_file("clusters.tsv");
        assert!(err.is_format_error());
        assert!(err.to_string().starts_with("clusters.tsv: Parse error at line 1"));
    }

    #[test]
    fn test_invalid_utf8_is_a_format_error() {
        let err = MembershipReader::new(&b"c1\tgA\nc\xe9\tgB\n"[..], KeyMode::Name)
            .pairs()
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().starts_with("Parse error at line 2"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let pairs = parse_pairs("c1\tgA\r\nc1\tgB\r\n", KeyMode::Name).unwrap();
        assert_eq!(pairs[1], MembershipPair::new("c1", GeneId::name("gB")));
    }

    #[test]
    fn test_empty_input() {
        let pairs = parse_pairs("", KeyMode::Name).unwrap();
        assert!(pairs.is_empty());
    }
}
