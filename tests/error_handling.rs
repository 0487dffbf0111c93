//! Error handling tests for the gct binary.
//!
//! Every failure must exit with status 1, print `Error: ...` on stderr and
//! leave the output directory untouched.

use std::fs;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

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

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_failed(output: &Output) {
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(output));
    assert!(stderr(output).contains("Error: "), "stderr: {}", stderr(output));
}

#[test]
fn test_malformed_membership_commits_nothing() {
    let clusters = create_input_file("A\t1\nA\t2\t3\nB\t2\n");
    let catalog = create_input_file(">g1\nA\n>g2\nC\n");
    let out = TempDir::new().unwrap();

    let output = run_gct(&[
        "genes",
        "--clusters",
        clusters.path().to_str().unwrap(),
        "--genes-catalog",
        catalog.path().to_str().unwrap(),
        "--output-dir",
        out.path().to_str().unwrap(),
    ]);

    assert_failed(&output);
    assert!(stderr(&output).contains("line 2"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_non_numeric_position_fails() {
    let clusters = create_input_file("A\tg1\n");
    let annotation = create_input_file("x\n");
    let out = TempDir::new().unwrap();

    let output = run_gct(&[
        "annotation",
        "--clusters",
        clusters.path().to_str().unwrap(),
        "--annotation",
        annotation.path().to_str().unwrap(),
        "--output-dir",
        out.path().to_str().unwrap(),
    ]);

    assert_failed(&output);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_input_file() {
    let catalog = create_input_file(">g1\nA\n");
    let out = TempDir::new().unwrap();
    let missing = out.path().join("missing.tsv");

    let output = run_gct(&[
        "genes",
        "--clusters",
        missing.to_str().unwrap(),
        "--genes-catalog",
        catalog.path().to_str().unwrap(),
        "--output-dir",
        out.path().to_str().unwrap(),
    ]);

    assert_failed(&output);
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_output_dir_must_exist() {
    let clusters = create_input_file("A\t1\n");
    let catalog = create_input_file(">g1\nA\n");
    let out = TempDir::new().unwrap();
    let missing_dir = out.path().join("nope");

    let output = run_gct(&[
        "genes",
        "--clusters",
        clusters.path().to_str().unwrap(),
        "--genes-catalog",
        catalog.path().to_str().unwrap(),
        "--output-dir",
        missing_dir.to_str().unwrap(),
    ]);

    assert_failed(&output);
    assert!(!missing_dir.exists());
}

#[test]
fn test_min_above_max_is_rejected() {
    let clusters = create_input_file("A\tg1\n");
    let out = TempDir::new().unwrap();
    let sizes = out.path().join("sizes.txt");

    let output = run_gct(&[
        "sizes",
        "--clusters",
        clusters.path().to_str().unwrap(),
        "--output-file",
        sizes.to_str().unwrap(),
        "--min-cluster-size",
        "5",
        "--max-cluster-size",
        "2",
    ]);

    assert_failed(&output);
    assert!(!sizes.exists());
}

#[test]
fn test_bad_connection_weight() {
    let clusters = create_input_file("A\t1\nA\t2\n");
    let connections = create_input_file("1 2 x\n");
    let out = TempDir::new().unwrap();

    let output = run_gct(&[
        "connections",
        "--clusters",
        clusters.path().to_str().unwrap(),
        "--genes-connections",
        connections.path().to_str().unwrap(),
        "--output-dir",
        out.path().to_str().unwrap(),
    ]);

    assert_failed(&output);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}
