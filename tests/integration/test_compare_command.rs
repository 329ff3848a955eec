//! End-to-end CLI tests for the compare command.
//!
//! These tests run the actual `fgconcord compare` binary and validate:
//! 1. Concordant and directional discordant outputs for a pair
//! 2. Concordance metrics and the summary report
//! 3. Reuse of existing outputs on a rerun
//! 4. One comparison per unordered pair of call sets
//! 5. Several experiments sharing one output directory

use std::fs;
use std::path::{Path, PathBuf};

use fgconcord_lib::engine::ConcordanceMetrics;
use tempfile::TempDir;

use crate::helpers::{
    VcfBuilder, count_records, create_test_reference, run_fgconcord, write_config, write_experiments,
};

/// callerX calls 100 sites; callerY calls the same 100 plus 200 more.
fn two_caller_setup(dir: &Path) -> PathBuf {
    let x = VcfBuilder::new("S1").hets(1000, 100).write(&dir.join("x.vcf"));
    let y = VcfBuilder::new("S1").hets(1000, 100).hets(50_000, 200).write(&dir.join("y.vcf"));
    let reference = create_test_reference(dir);
    write_config(
        &dir.join("run.yaml"),
        Some(&dir.join("out")),
        "S1",
        &reference,
        &[("callerX", &x), ("callerY", &y)],
    )
}

fn run_compare(config: &Path) {
    let output = run_fgconcord(&["compare", "--config", config.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "Compare command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_compare_two_call_sets() {
    let temp_dir = TempDir::new().unwrap();
    let config = two_caller_setup(temp_dir.path());
    run_compare(&config);

    let out = temp_dir.path().join("out");
    assert_eq!(count_records(&out.join("S1-x-y-combine.vcf")), 300);
    assert_eq!(count_records(&out.join("S1-callerX-callerY-concordance.vcf")), 100);
    assert_eq!(count_records(&out.join("S1-callerX-callerY-discordance.vcf")), 0);
    assert_eq!(count_records(&out.join("S1-callerY-callerX-discordance.vcf")), 200);

    let metrics = ConcordanceMetrics::read(&out.join("S1-callerX-callerY-concordance.eval")).unwrap();
    assert_eq!(metrics.summary.sample, "S1");
    assert_eq!(metrics.summary.both_called, 100);
    assert!((metrics.summary.genotype_concordance - 1.0).abs() < 1e-9);
    assert!((metrics.summary.non_ref_sensitivity - 100.0 / 300.0).abs() < 1e-4);

    let report = fs::read_to_string(out.join("run-summary.txt")).unwrap();
    assert!(report.contains("* S1"));
    assert!(report.contains("** callerX and callerY"));
    assert!(report.contains("S1-callerY-callerX-discordance.vcf"));
}

#[test]
fn test_compare_rerun_reuses_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let config = two_caller_setup(temp_dir.path());
    run_compare(&config);

    let out = temp_dir.path().join("out");
    let reused = [
        out.join("S1-x-y-combine.vcf"),
        out.join("S1-callerX-callerY-concordance.vcf"),
        out.join("S1-callerY-callerX-discordance.vcf"),
        out.join("S1-callerX-callerY-concordance.eval"),
    ];
    let modified: Vec<_> = reused.iter().map(|p| fs::metadata(p).unwrap().modified().unwrap()).collect();

    run_compare(&config);
    for (path, before) in reused.iter().zip(modified) {
        assert_eq!(
            fs::metadata(path).unwrap().modified().unwrap(),
            before,
            "{} was rewritten",
            path.display()
        );
    }
    assert!(out.join("run-summary.txt").exists());
}

#[test]
fn test_compare_three_call_sets() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let a = VcfBuilder::new("S1").hets(1000, 10).write(&dir.join("a.vcf"));
    let b = VcfBuilder::new("S1").hets(1000, 10).site(5000, "C", "T", "1/1").write(&dir.join("b.vcf"));
    let c = VcfBuilder::new("S1").hets(1000, 5).write(&dir.join("c.vcf"));
    let reference = create_test_reference(dir);
    let config = write_config(
        &dir.join("trio.yaml"),
        Some(&dir.join("out")),
        "S1",
        &reference,
        &[("A", &a), ("B", &b), ("C", &c)],
    );
    run_compare(&config);

    let report = fs::read_to_string(dir.join("out").join("trio-summary.txt")).unwrap();
    assert_eq!(report.matches("** ").count(), 3);
    for heading in ["** A and B", "** A and C", "** B and C"] {
        assert!(report.contains(heading), "missing {heading}");
    }
    assert_eq!(count_records(&dir.join("out").join("S1-B-A-discordance.vcf")), 1);
    assert_eq!(count_records(&dir.join("out").join("S1-A-C-discordance.vcf")), 5);
}

#[test]
fn test_compare_single_call_set_writes_no_pair_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let a = VcfBuilder::new("S1").hets(1000, 10).write(&dir.join("a.vcf"));
    let reference = create_test_reference(dir);
    let config =
        write_config(&dir.join("one.yaml"), Some(&dir.join("out")), "S1", &reference, &[("A", &a)]);
    run_compare(&config);

    let report = fs::read_to_string(dir.join("out").join("one-summary.txt")).unwrap();
    assert!(report.contains("* S1"));
    assert!(!report.contains("** "));
    let vcfs = fs::read_dir(dir.join("out"))
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "vcf"))
        .count();
    assert_eq!(vcfs, 0);
}

#[test]
fn test_compare_without_output_dir_reports_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let x = VcfBuilder::new("S1").hets(1000, 3).write(&dir.join("x.vcf"));
    let y = VcfBuilder::new("S1").hets(1000, 3).write(&dir.join("y.vcf"));
    let reference = create_test_reference(dir);
    let config =
        write_config(&dir.join("run.yaml"), None, "S1", &reference, &[("callerX", &x), ("callerY", &y)]);

    let output = run_fgconcord(&["compare", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("** callerX and callerY"));
    assert_eq!(count_records(&dir.join("S1-callerX-callerY-concordance.vcf")), 3);
}

#[test]
fn test_compare_site_called_only_by_second_set() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let x = VcfBuilder::new("S1").site(100, "A", "T", "0/1").write(&dir.join("callerX.vcf"));
    let y = VcfBuilder::new("S1")
        .site(100, "A", "T", "0/1")
        .site(200, "A", "G", "0/1")
        .write(&dir.join("callerY.vcf"));
    let reference = create_test_reference(dir);
    let config = write_config(
        &dir.join("run.yaml"),
        Some(&dir.join("out")),
        "S1",
        &reference,
        &[("callerX", &x), ("callerY", &y)],
    );
    run_compare(&config);

    let out = dir.join("out");
    let positions = |name: &str| -> Vec<usize> {
        fgconcord_lib::vcf::VcfReader::from_path(out.join(name)).unwrap().map(|r| r.unwrap().pos()).collect()
    };
    assert_eq!(positions("S1-callerX-callerY-concordance.vcf"), vec![100]);
    assert_eq!(positions("S1-callerY-callerX-discordance.vcf"), vec![200]);
    assert!(positions("S1-callerX-callerY-discordance.vcf").is_empty());
}

#[test]
fn test_compare_two_samples_share_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    // S1 agrees at both sites; S2 disagrees at 200.
    let x = VcfBuilder::with_samples(&["S1", "S2"])
        .site_calls(100, "A", "G", &["0/1", "0/1"])
        .site_calls(200, "C", "T", &["0/1", "0/1"])
        .write(&dir.join("x.vcf"));
    let y = VcfBuilder::with_samples(&["S1", "S2"])
        .site_calls(100, "A", "G", &["0/1", "0/1"])
        .site_calls(200, "C", "T", &["0/1", "1/1"])
        .write(&dir.join("y.vcf"));
    let reference = create_test_reference(dir);
    let calls: &[(&str, &Path)] = &[("callerX", &x), ("callerY", &y)];
    let config = write_experiments(
        &dir.join("run.yaml"),
        Some(&dir.join("out")),
        &[("S1", &reference, calls), ("S2", &reference, calls)],
    );
    run_compare(&config);

    let out = dir.join("out");
    let merged_columns = |name: &str| -> Vec<String> {
        fgconcord_lib::vcf::VcfReader::from_path(out.join(name)).unwrap().header().sample_names()
    };
    assert_eq!(merged_columns("S1-x-y-combine.vcf"), vec!["S1.x", "S1.y"]);
    assert_eq!(merged_columns("S2-x-y-combine.vcf"), vec!["S2.x", "S2.y"]);

    assert_eq!(count_records(&out.join("S1-callerX-callerY-concordance.vcf")), 2);
    assert_eq!(count_records(&out.join("S1-callerX-callerY-discordance.vcf")), 0);
    assert_eq!(count_records(&out.join("S2-callerX-callerY-concordance.vcf")), 1);
    assert_eq!(count_records(&out.join("S2-callerX-callerY-discordance.vcf")), 1);

    let report = fs::read_to_string(out.join("run-summary.txt")).unwrap();
    assert!(report.contains("* S1"));
    assert!(report.contains("* S2"));
    assert_eq!(report.matches("** callerX and callerY").count(), 2);
}
