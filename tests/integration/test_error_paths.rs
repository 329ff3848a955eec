//! Error path integration tests.
//!
//! These tests verify that invalid configurations and inputs stop the run with a
//! non-zero exit status and a message naming the problem.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::helpers::{VcfBuilder, create_test_reference, run_fgconcord, write_config};

fn assert_fails_with(args: &[&str], expected: &str) {
    let output = run_fgconcord(args);
    assert!(!output.status.success(), "Expected failure for {args:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(expected), "stderr did not mention '{expected}':\n{stderr}");
}

#[test]
fn test_missing_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("absent.yaml");
    assert_fails_with(&["compare", "--config", config.to_str().unwrap()], "does not exist");
}

#[test]
fn test_malformed_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.yaml");
    fs::write(&config, "experiments: [\n  - sample: S1\n").unwrap();
    assert_fails_with(&["compare", "--config", config.to_str().unwrap()], "Invalid configuration");
}

#[test]
fn test_colliding_provenance_labels() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("a")).unwrap();
    fs::create_dir(dir.join("b")).unwrap();
    let first = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("a").join("calls.vcf"));
    let second = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("b").join("calls.vcf.gz"));
    let reference = create_test_reference(dir);
    let config = write_config(
        &dir.join("run.yaml"),
        Some(&dir.join("out")),
        "S1",
        &reference,
        &[("callerX", &first), ("callerY", &second)],
    );
    assert_fails_with(&["compare", "--config", config.to_str().unwrap()], "provenance label 'calls'");
    assert!(!dir.join("out").join("S1-calls-calls-combine.vcf").exists());
}

#[test]
fn test_missing_call_set_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let first = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("x.vcf"));
    let reference = create_test_reference(dir);
    let config = write_config(
        &dir.join("run.yaml"),
        Some(&dir.join("out")),
        "S1",
        &reference,
        &[("callerX", &first), ("callerY", &dir.join("y.vcf"))],
    );
    assert_fails_with(&["compare", "--config", config.to_str().unwrap()], "Failed to compare callerX and callerY");
}

#[test]
fn test_sample_not_in_call_set() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let first = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("x.vcf"));
    let second = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("y.vcf"));
    let out = dir.join("out");
    // Single-sample files fall back to their only column, so a two-sample file is needed.
    let text = fs::read_to_string(&second).unwrap().replace("\tS1\n", "\tS1\tS2\n").replace("0/1\n", "0/1\t0/0\n");
    fs::write(&second, text).unwrap();

    assert_fails_with(
        &[
            "merge",
            "-s",
            "S3",
            "-a",
            first.to_str().unwrap(),
            "-b",
            second.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ],
        "S3",
    );
}

#[test]
fn test_invalid_call_set_name() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let first = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("x.vcf"));
    let second = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("y.vcf"));
    let reference = create_test_reference(dir);
    let config = write_config(
        &dir.join("run.yaml"),
        None,
        "S1",
        &reference,
        &[("caller/X", &first), ("callerY", &second)],
    );
    assert_fails_with(&["compare", "--config", config.to_str().unwrap()], "path separator");
}

#[test]
fn test_call_set_names_sharing_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let calls: Vec<PathBuf> = ["one", "two", "three", "four"]
        .iter()
        .map(|stem| VcfBuilder::new("S").hets(100, 2).write(&dir.join(format!("{stem}.vcf"))))
        .collect();
    let reference = create_test_reference(dir);
    let config = write_config(
        &dir.join("run.yaml"),
        Some(&dir.join("out")),
        "S",
        &reference,
        &[("a-b", &calls[0]), ("c", &calls[1]), ("a", &calls[2]), ("b-c", &calls[3])],
    );
    assert_fails_with(&["compare", "--config", config.to_str().unwrap()], "S-a-b-c-concordance.vcf");
    assert!(!dir.join("out").join("S-one-two-combine.vcf").exists());
}

#[test]
fn test_label_unusable_in_info() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let first = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("run;1.vcf"));
    let second = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("y.vcf"));
    let reference = create_test_reference(dir);
    let config = write_config(
        &dir.join("run.yaml"),
        None,
        "S1",
        &reference,
        &[("callerX", &first), ("callerY", &second)],
    );
    assert_fails_with(&["compare", "--config", config.to_str().unwrap()], "cannot appear in an INFO value");
}
