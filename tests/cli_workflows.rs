//! End-to-end tests for the gct binary.
//!
//! Tests cover:
//! 1. Per-cluster outputs for every grouping subcommand
//! 2. Combined report and table layouts
//! 3. Cluster size bounds
//! 4. compare, sizes and annotation-table outputs

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

// =============================================================================
// Helper functions
// =============================================================================

fn create_input_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn run_gct(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gct"))
        .args(args)
        .output()
        .expect("Failed to run gct")
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

const CATALOG: &str = ">g1 first\nAAAA\n>g2\nCCCC\n>g3\nGG\nGG\n>g4\nTTTT\n";

// =============================================================================
// genes
// =============================================================================

#[test]
fn test_genes_per_cluster_files_by_position() {
    let clusters = create_input_file("A\t1\nA\t3\nB\t3\nB\t4\nC\t2\n");
    let catalog = create_input_file(CATALOG);
    let out = TempDir::new().unwrap();

    let output = run_gct(&[
        "genes",
        "--clusters",
        path(&clusters),
        "--genes-catalog",
        path(&catalog),
        "--output-dir",
        out.path().to_str().unwrap(),
        "--min-cluster-size",
        "2",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read(&out.path().join("A.fna")), ">g1 first\nAAAA\n>g3\nGGGG\n");
    assert_eq!(read(&out.path().join("B.fna")), ">g3\nGGGG\n>g4\nTTTT\n");
    assert!(!out.path().join("C.fna").exists());
}

#[test]
fn test_genes_by_name_report() {
    let clusters = create_input_file("A\tg2\nA\tg4\n");
    let catalog = create_input_file(CATALOG);
    let out = TempDir::new().unwrap();
    let report = out.path().join("genes.txt");

    let output = run_gct(&[
        "genes",
        "--clusters",
        path(&clusters),
        "--genes-catalog",
        path(&catalog),
        "--key-mode",
        "name",
        "--output-file",
        report.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        read(&report),
        "A (2 genes):\n\t>g2\n\tCCCC\n\t>g4\n\tTTTT\n\n"
    );
}

#[test]
fn test_output_dir_and_file_conflict() {
    let clusters = create_input_file("A\t1\n");
    let catalog = create_input_file(CATALOG);
    let out = TempDir::new().unwrap();

    let output = run_gct(&[
        "genes",
        "--clusters",
        path(&clusters),
        "--genes-catalog",
        path(&catalog),
        "--output-dir",
        out.path().to_str().unwrap(),
        "--output-file",
        out.path().join("x.txt").to_str().unwrap(),
    ]);

    assert!(!output.status.success());
}

// =============================================================================
// profile / annotation / connections / motus
// =============================================================================

#[test]
fn test_profile_with_header() {
    let clusters = create_input_file("A\tg1\nA\tg3\n");
    let profiles = create_input_file("gene\ts1\ng1\t4\ng2\t0\ng3\t7\n");
    let out = TempDir::new().unwrap();

    let output = run_gct(&[
        "profile",
        "--clusters",
        path(&clusters),
        "--profiles",
        path(&profiles),
        "--with-header",
        "--output-dir",
        out.path().to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read(&out.path().join("A_profile.txt")), "g1\t4\ng3\t7\n");
}

#[test]
fn test_annotation_default_table() {
    let clusters = create_input_file("c1\t2\nc2\t2\nc2\t1\n");
    let annotation = create_input_file("K1\tfirst\nK2\tsecond\n");
    let out = TempDir::new().unwrap();
    let table = out.path().join("annotation.txt");

    let output = run_gct(&[
        "annotation",
        "--clusters",
        path(&clusters),
        "--annotation",
        path(&annotation),
        "--output-file",
        table.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    // Clusters appear in dispatch order: line 1 reaches c2 first
    assert_eq!(
        read(&table),
        "c2\tK1\tfirst\nc2\tK2\tsecond\nc1\tK2\tsecond\n"
    );
}

#[test]
fn test_connections_report() {
    let clusters = create_input_file("A\t1\nA\t2\nA\t3\nB\t4\n");
    let connections = create_input_file("1 2 10\n2 4 3\n3 1 1\n");
    let out = TempDir::new().unwrap();
    let report = out.path().join("connections.txt");

    let output = run_gct(&[
        "connections",
        "--clusters",
        path(&clusters),
        "--genes-connections",
        path(&connections),
        "--output-file",
        report.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read(&report), "A (3 genes):\n\t1\t2\t10\n\t3\t1\t1\n\n");
}

#[test]
fn test_motus_per_cluster_files() {
    let clusters = create_input_file("c1\tg1\nc1\tg2\nc1\tg3\n");
    let motus = create_input_file("g1 x motu_b\ng2 motu_a\ng3 motu_b\n");
    let out = TempDir::new().unwrap();

    let output = run_gct(&[
        "motus",
        "--clusters",
        path(&clusters),
        "--motus",
        path(&motus),
        "--output-dir",
        out.path().to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        read(&out.path().join("c1.mOTUs.txt")),
        "motu_a=g2\nmotu_b=g1,g3\n"
    );
}

// =============================================================================
// compare / sizes / annotation-table
// =============================================================================

#[test]
fn test_compare_report() {
    let reference = create_input_file("c1\tgA\nc2\tgB\n");
    let query = create_input_file("q1\tgA\nq1\tgB\nq1\tgC\n");
    let out = TempDir::new().unwrap();
    let report = out.path().join("comparison.txt");

    let output = run_gct(&[
        "compare",
        "--ref",
        path(&reference),
        "--query",
        path(&query),
        "--output-file",
        report.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        read(&report),
        "q1 (3 genes):\n\tc1\t1\n\tc2\t1\n\tunknown\t1\n\n"
    );
}

#[test]
fn test_compare_query_min_cluster_size() {
    let reference = create_input_file("c1\tgA\nc2\tgB\n");
    let query = create_input_file("q1\tgA\nq1\tgB\nq2\tgB\n");
    let out = TempDir::new().unwrap();
    let report = out.path().join("comparison.txt");

    let output = run_gct(&[
        "compare",
        "--ref",
        path(&reference),
        "--query",
        path(&query),
        "--output-file",
        report.to_str().unwrap(),
        "--query-min-cluster-size",
        "2",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read(&report), "q1 (2 genes):\n\tc1\t1\n\tc2\t1\n\n");
}

#[test]
fn test_sizes_max_bound() {
    let clusters = create_input_file("a g1\nb g2\nb g3\nb g4\nc g5\nc g6\n");
    let out = TempDir::new().unwrap();
    let sizes = out.path().join("sizes.txt");

    let output = run_gct(&[
        "sizes",
        "--clusters",
        path(&clusters),
        "--output-file",
        sizes.to_str().unwrap(),
        "--max-cluster-size",
        "2",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read(&sizes), "c\t2\na\t1\n");
}

#[test]
fn test_annotation_table() {
    let catalog = create_input_file(CATALOG);
    let taxonomic = create_input_file("g2\tBacteria\t0.9\n");
    let functional = create_input_file("q g1 K00001\nq g4 K00004\n");
    let out = TempDir::new().unwrap();
    let table = out.path().join("table.txt");

    let output = run_gct(&[
        "annotation-table",
        "--genes-catalog",
        path(&catalog),
        "--taxonomic-annotation",
        path(&taxonomic),
        "--functional-annotation",
        path(&functional),
        "--annotation-table",
        table.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        read(&table),
        "g1\tNA\tK00001\ng2\tBacteria\tNA\ng3\tNA\tNA\ng4\tNA\tK00004\n"
    );
}
