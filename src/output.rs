//! Output sinks for cluster groupings.
//!
//! Three layouts share one payload renderer:
//! - combined report: one `<cluster> (<n> genes):` section per cluster
//! - cluster-tagged table: every line prefixed with `<cluster>\t`
//! - per-cluster files: `<dir>/<cluster><suffix>`, committed all at once

use crate::groups::ClusterGroups;
use crate::membership::{ClusterError, Result};
use crate::payload::{Payload, PayloadKind};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffer size for combined outputs (1MB).
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Buffered writer for cluster sections and cluster-tagged lines.
pub struct ClusterWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    prefix: Vec<u8>,
}

impl<W: Write> ClusterWriter<W> {
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            prefix: Vec::with_capacity(64),
        }
    }

    /// Write a `<cluster> (<n> genes):` section header.
    pub fn write_section_header(&mut self, cluster: &str, size: usize) -> Result<()> {
        self.writer.write_all(cluster.as_bytes())?;
        self.writer.write_all(b" (")?;
        self.writer
            .write_all(self.itoa_buf.format(size).as_bytes())?;
        self.writer.write_all(b" genes):\n")?;
        Ok(())
    }

    /// Write one report section: header, tab-indented entries, blank line.
    pub fn write_section(&mut self, cluster: &str, size: usize, entries: &[Payload]) -> Result<()> {
        self.write_section_header(cluster, size)?;
        for entry in entries {
            entry.render(&mut self.writer, b"\t")?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write every entry of a cluster, each line prefixed by the cluster name.
    pub fn write_tagged(&mut self, cluster: &str, entries: &[Payload]) -> Result<()> {
        self.prefix.clear();
        self.prefix.extend_from_slice(cluster.as_bytes());
        self.prefix.push(b'\t');
        for entry in entries {
            entry.render(&mut self.writer, &self.prefix)?;
        }
        Ok(())
    }

    /// Write entries without any prefix.
    pub fn write_plain(&mut self, entries: &[Payload]) -> Result<()> {
        for entry in entries {
            entry.render(&mut self.writer, b"")?;
        }
        Ok(())
    }

    /// Write a raw line followed by a newline.
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write `<name>\t<count>`.
    pub fn write_count_line(&mut self, name: &str, count: usize) -> Result<()> {
        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(count).as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ClusterError::Io(e.into_error()))
    }
}

/// Render a grouping as a combined report.
///
/// `size_of` gives the gene count printed in each section header.
pub fn write_report<W, F>(output: W, groups: &ClusterGroups<Payload>, mut size_of: F) -> Result<()>
where
    W: Write,
    F: FnMut(&str, &[Payload]) -> usize,
{
    let mut writer = ClusterWriter::new(output);
    for (cluster, entries) in groups.iter() {
        let size = size_of(cluster, entries);
        writer.write_section(cluster, size, entries)?;
    }
    writer.flush()
}

/// Render a grouping as one cluster-tagged table.
pub fn write_table<W: Write>(output: W, groups: &ClusterGroups<Payload>) -> Result<()> {
    let mut writer = ClusterWriter::new(output);
    for (cluster, entries) in groups.iter() {
        writer.write_tagged(cluster, entries)?;
    }
    writer.flush()
}

/// Writes one file per cluster into a target directory.
///
/// Files are first written into a hidden staging directory inside the
/// target and moved into place only once every cluster was written; on
/// error the staging directory is removed and the target is left untouched.
pub struct PerClusterWriter {
    dir: PathBuf,
    kind: PayloadKind,
}

impl PerClusterWriter {
    pub fn new<P: AsRef<Path>>(dir: P, kind: PayloadKind) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            kind,
        }
    }

    /// Final path of a cluster's file.
    pub fn path_for(&self, cluster: &str) -> PathBuf {
        self.dir.join(format!("{}{}", cluster, self.kind.suffix()))
    }

    /// Write every cluster of the grouping; returns the committed paths in
    /// cluster order.
    pub fn write_all(&self, groups: &ClusterGroups<Payload>) -> Result<Vec<PathBuf>> {
        for cluster in groups.clusters() {
            check_file_name(cluster)?;
        }

        let staging = tempfile::Builder::new()
            .prefix(".gct-staging-")
            .tempdir_in(&self.dir)?;

        let mut staged = Vec::with_capacity(groups.len());
        for (cluster, entries) in groups.iter() {
            let file_name = format!("{}{}", cluster, self.kind.suffix());
            let staged_path = staging.path().join(&file_name);

            let mut writer = ClusterWriter::with_capacity(64 * 1024, File::create(&staged_path)?);
            writer.write_plain(entries)?;
            writer.into_inner()?.sync_all()?;

            staged.push((staged_path, self.dir.join(file_name)));
        }

        let mut committed = Vec::with_capacity(staged.len());
        for (from, to) in staged {
            fs::rename(&from, &to)?;
            committed.push(to);
        }
        log::debug!(
            "wrote {} cluster files to {}",
            committed.len(),
            self.dir.display()
        );

        Ok(committed)
    }
}

fn check_file_name(cluster: &str) -> Result<()> {
    let unusable = cluster.is_empty()
        || cluster == "."
        || cluster == ".."
        || cluster.contains('/')
        || cluster.contains('\\')
        || cluster.contains('\0');
    if unusable {
        return Err(ClusterError::InvalidArgument(format!(
            "cluster name '{}' cannot be used as a file name",
            cluster
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fasta::FastaRecord;
    use tempfile::TempDir;

    fn annotation_groups() -> ClusterGroups<Payload> {
        let mut groups = ClusterGroups::new();
        groups.push("c1", Payload::Annotation(b"a1".to_vec()));
        groups.push("c2", Payload::Annotation(b"b1".to_vec()));
        groups.push("c1", Payload::Annotation(b"a2".to_vec()));
        groups
    }

    #[test]
    fn test_write_report() {
        let mut output = Vec::new();
        write_report(&mut output, &annotation_groups(), |_, entries| entries.len()).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "c1 (2 genes):\n\ta1\n\ta2\n\nc2 (1 genes):\n\tb1\n\n"
        );
    }

    #[test]
    fn test_write_table() {
        let mut output = Vec::new();
        write_table(&mut output, &annotation_groups()).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "c1\ta1\nc1\ta2\nc2\tb1\n");
    }

    #[test]
    fn test_write_count_line() {
        let mut output = Vec::new();
        {
            let mut writer = ClusterWriter::new(&mut output);
            writer.write_count_line("c7", 42).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"c7\t42\n");
    }

    #[test]
    fn test_per_cluster_files() {
        let dir = TempDir::new().unwrap();
        let mut groups = ClusterGroups::new();
        groups.push("c1", Payload::Sequence(FastaRecord::new(">g1", "AC")));
        groups.push("c1", Payload::Sequence(FastaRecord::new(">g2", "GT")));
        groups.push("c2", Payload::Sequence(FastaRecord::new(">g3", "TT")));

        let writer = PerClusterWriter::new(dir.path(), PayloadKind::Sequence);
        let paths = writer.write_all(&groups).unwrap();

        assert_eq!(paths, vec![dir.path().join("c1.fna"), dir.path().join("c2.fna")]);
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), ">g1\nAC\n>g2\nGT\n");
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), ">g3\nTT\n");

        // Staging directory is gone
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_unusable_cluster_name_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut groups = ClusterGroups::new();
        groups.push("ok", Payload::Profile(b"g1\t1".to_vec()));
        groups.push("../escape", Payload::Profile(b"g2\t2".to_vec()));

        let writer = PerClusterWriter::new(dir.path(), PayloadKind::Profile);
        assert!(writer.write_all(&groups).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_path_for() {
        let writer = PerClusterWriter::new("/out", PayloadKind::Connections);
        assert_eq!(writer.path_for("c9"), PathBuf::from("/out/c9_connections.txt"));
    }
}
