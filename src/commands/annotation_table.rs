//! Annotation table command implementation.
//!
//! Merges a taxonomic and a functional annotation into one table with a
//! row per catalog gene, in catalog order.

use crate::fasta::FastaReader;
use crate::gene::GeneId;
use crate::membership::{ClusterError, Result};
use crate::output::ClusterWriter;
use crate::sources::{FunctionalAnnotationReader, TaxonomicAnnotationReader};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Value written for a gene without annotation.
pub const MISSING_ANNOTATION: &str = "NA";

/// One row of the merged table. Annotation values are raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub gene: String,
    pub taxonomic: Option<Vec<u8>>,
    pub functional: Option<Vec<u8>>,
}

impl AnnotationRow {
    fn render_into(&self, line: &mut Vec<u8>) {
        let missing = MISSING_ANNOTATION.as_bytes();
        line.clear();
        line.extend_from_slice(self.gene.as_bytes());
        line.push(b'\t');
        line.extend_from_slice(self.taxonomic.as_deref().unwrap_or(missing));
        line.push(b'\t');
        line.extend_from_slice(self.functional.as_deref().unwrap_or(missing));
    }
}

/// Annotation table command.
#[derive(Debug, Clone, Default)]
pub struct AnnotationTableCommand;

impl AnnotationTableCommand {
    pub fn new() -> Self {
        Self
    }

    /// Run on files. Returns the number of rows written.
    pub fn run<P, Q, S, O>(&self, catalog: P, taxonomic: Q, functional: S, output: O) -> Result<usize>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        S: AsRef<Path>,
        O: AsRef<Path>,
    {
        let (catalog, taxonomic, functional, output) = (
            catalog.as_ref(),
            taxonomic.as_ref(),
            functional.as_ref(),
            output.as_ref(),
        );

        log::info!("STEP 1/4: Reading genes catalog...");
        let genes = FastaReader::from_path(catalog)
            .and_then(|reader| self.catalog_genes(reader))
            .map_err(|e| e.in_file(catalog))?;
        log::debug!("catalog: {} genes", genes.len());

        log::info!("STEP 2/4: Reading taxonomic annotation...");
        let taxonomy: FxHashMap<GeneId, Vec<u8>> = TaxonomicAnnotationReader::from_path(taxonomic)
            .and_then(|reader| reader.annotations().collect())
            .map_err(|e| e.in_file(taxonomic))?;
        log::debug!("taxonomic annotation: {} genes", taxonomy.len());

        log::info!("STEP 3/4: Reading functional annotation...");
        let function: FxHashMap<GeneId, Vec<u8>> = FunctionalAnnotationReader::from_path(functional)
            .and_then(|reader| reader.annotations().collect())
            .map_err(|e| e.in_file(functional))?;
        log::debug!("functional annotation: {} genes", function.len());

        log::info!("STEP 4/4: Writing annotation table...");
        let rows = self.merge(genes, &taxonomy, &function);
        let out = File::create(output).map_err(|e| ClusterError::from(e).in_file(output))?;
        self.write(out, &rows)?;

        Ok(rows.len())
    }

    /// Gene names of the catalog, in record order.
    pub fn catalog_genes<R: Read>(&self, catalog: FastaReader<R>) -> Result<Vec<String>> {
        catalog
            .records()
            .map(|record| record.map(|r| r.name().into_owned()))
            .collect()
    }

    /// Look both annotations up for every catalog gene.
    pub fn merge(
        &self,
        genes: Vec<String>,
        taxonomy: &FxHashMap<GeneId, Vec<u8>>,
        function: &FxHashMap<GeneId, Vec<u8>>,
    ) -> Vec<AnnotationRow> {
        genes
            .into_iter()
            .map(|gene| {
                let key = GeneId::name(gene.as_str());
                AnnotationRow {
                    taxonomic: taxonomy.get(&key).cloned(),
                    functional: function.get(&key).cloned(),
                    gene,
                }
            })
            .collect()
    }

    pub fn write<W: Write>(&self, output: W, rows: &[AnnotationRow]) -> Result<()> {
        let mut writer = ClusterWriter::new(output);
        let mut line = Vec::with_capacity(256);
        for row in rows {
            row.render_into(&mut line);
            writer.write_line(&line)?;
        }
        writer.flush()
    }
}
