//! Core identifier types for genes and clusters.

use std::fmt;
use std::str::FromStr;

/// Name of a cluster, unique within one membership file.
pub type ClusterId = String;

/// Identifier of a clustered gene.
///
/// Genes are either named by a token or referred to by their 1-based
/// position in an unkeyed catalog (FASTA record number, table line number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneId {
    Name(String),
    Ordinal(u64),
}

impl GeneId {
    /// Create a named gene identifier.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        GeneId::Name(name.into())
    }

    /// Create a positional gene identifier.
    #[inline]
    pub fn ordinal(position: u64) -> Self {
        GeneId::Ordinal(position)
    }

    /// Returns the 1-based position for positional identifiers.
    #[inline]
    pub fn as_ordinal(&self) -> Option<u64> {
        match self {
            GeneId::Ordinal(n) => Some(*n),
            GeneId::Name(_) => None,
        }
    }
}

impl fmt::Display for GeneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneId::Name(name) => f.write_str(name),
            GeneId::Ordinal(n) => write!(f, "{}", n),
        }
    }
}

/// How gene tokens are interpreted and how secondary records are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// Join on an explicit gene name (first column or first header token).
    #[default]
    Name,
    /// Join on the 1-based position of the record in the secondary source.
    Position,
}

impl KeyMode {
    /// Interpret a gene token from a membership or connection file.
    ///
    /// Returns `None` when the token is not a positive integer in
    /// positional mode.
    pub fn parse_token(self, token: &str) -> Option<GeneId> {
        match self {
            KeyMode::Name => Some(GeneId::Name(token.to_string())),
            KeyMode::Position => match token.parse::<u64>() {
                Ok(n) if n > 0 => Some(GeneId::Ordinal(n)),
                _ => None,
            },
        }
    }
}

impl FromStr for KeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(KeyMode::Name),
            "position" => Ok(KeyMode::Position),
            other => Err(format!(
                "unknown key mode '{}' (expected 'name' or 'position')",
                other
            )),
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Name => f.write_str("name"),
            KeyMode::Position => f.write_str("position"),
        }
    }
}
