//! Everything that can be written under a cluster.
//!
//! Payloads form a closed set; each variant knows how to render itself as
//! one or more lines. Verbatim lines are written back byte for byte.

use crate::compare::RefCluster;
use crate::fasta::FastaRecord;
use crate::gene::GeneId;
use crate::sources::Connection;
use std::io::{self, Write};

/// Kind of payload, selecting the per-cluster file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Sequence,
    Profile,
    Connections,
    Annotation,
    TaxonomicUnits,
}

impl PayloadKind {
    /// File name suffix appended to the cluster name.
    pub fn suffix(self) -> &'static str {
        match self {
            PayloadKind::Sequence => ".fna",
            PayloadKind::Profile => "_profile.txt",
            PayloadKind::Connections => "_connections.txt",
            PayloadKind::Annotation => ".annotation.txt",
            PayloadKind::TaxonomicUnits => ".mOTUs.txt",
        }
    }
}

/// One entry of a cluster group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Annotation line, copied verbatim.
    Annotation(Vec<u8>),
    /// Abundance profile row, copied verbatim.
    Profile(Vec<u8>),
    /// FASTA record.
    Sequence(FastaRecord),
    /// Gene connection whose endpoints share the cluster.
    Connection(Connection),
    /// Genes of the cluster carrying one taxonomic-unit label.
    Units { label: String, genes: Vec<GeneId> },
    /// Genes shared with one reference cluster (or with none).
    Overlap { reference: RefCluster, count: usize },
}

impl Payload {
    /// Write the payload, every line starting with `prefix`.
    ///
    /// Verbatim lines that ended in `\r\n` keep their `\r`.
    pub fn render<W: Write>(&self, out: &mut W, prefix: &[u8]) -> io::Result<()> {
        let mut itoa_buf = itoa::Buffer::new();
        out.write_all(prefix)?;
        match self {
            Payload::Annotation(line) | Payload::Profile(line) => {
                out.write_all(line)?;
            }
            Payload::Sequence(record) => {
                out.write_all(&record.header)?;
                out.write_all(b"\n")?;
                out.write_all(prefix)?;
                out.write_all(&record.sequence)?;
            }
            Payload::Connection(edge) => {
                write_gene(out, &edge.gene_a, &mut itoa_buf)?;
                out.write_all(b"\t")?;
                write_gene(out, &edge.gene_b, &mut itoa_buf)?;
                out.write_all(b"\t")?;
                out.write_all(itoa_buf.format(edge.weight).as_bytes())?;
            }
            Payload::Units { label, genes } => {
                out.write_all(label.as_bytes())?;
                out.write_all(b"=")?;
                for (i, gene) in genes.iter().enumerate() {
                    if i > 0 {
                        out.write_all(b",")?;
                    }
                    write_gene(out, gene, &mut itoa_buf)?;
                }
            }
            Payload::Overlap { reference, count } => {
                out.write_all(reference.label().as_bytes())?;
                out.write_all(b"\t")?;
                out.write_all(itoa_buf.format(*count).as_bytes())?;
            }
        }
        out.write_all(b"\n")
    }

    /// Render into a string (useful for testing).
    pub fn to_text(&self, prefix: &str) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.render(&mut buf, prefix.as_bytes());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[inline]
fn write_gene<W: Write>(out: &mut W, gene: &GeneId, itoa_buf: &mut itoa::Buffer) -> io::Result<()> {
    match gene {
        GeneId::Name(name) => out.write_all(name.as_bytes()),
        GeneId::Ordinal(n) => out.write_all(itoa_buf.format(*n).as_bytes()),
    }
}
