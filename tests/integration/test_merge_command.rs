//! End-to-end CLI tests for the merge command.

use fgconcord_lib::vcf::VcfReader;
use tempfile::TempDir;

use crate::helpers::{VcfBuilder, count_records, run_fgconcord};

#[test]
fn test_merge_command_with_split() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let first = VcfBuilder::new("S1")
        .site(100, "A", "G", "0/1")
        .site(200, "C", "T", "1/1")
        .site(300, "G", "A", "0/1")
        .write(&dir.join("first.vcf"));
    let second = VcfBuilder::new("S1")
        .site(100, "A", "G", "0/1")
        .site(200, "C", "T", "0/1")
        .site(400, "T", "C", "0/1")
        .write(&dir.join("second.vcf"));
    let out = dir.join("out");

    let output = run_fgconcord(&[
        "merge",
        "--sample",
        "S1",
        "--first",
        first.to_str().unwrap(),
        "--first-name",
        "callerX",
        "--second",
        second.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--split",
    ]);
    assert!(output.status.success(), "Merge failed: {}", String::from_utf8_lossy(&output.stderr));

    let merged = out.join("S1-first-second-combine.vcf");
    let reader = VcfReader::from_path(&merged).unwrap();
    assert_eq!(reader.header().sample_names(), vec!["S1.first", "S1.second"]);
    let records: Vec<_> = reader.map(|r| r.unwrap()).collect();
    let positions: Vec<_> = records.iter().map(|r| r.pos()).collect();
    assert_eq!(positions, vec![100, 200, 300, 400]);
    let sets: Vec<_> = records.iter().map(|r| r.info_value("set").unwrap().to_string()).collect();
    assert_eq!(sets, vec!["Intersection", "Intersection", "first", "second"]);

    assert_eq!(count_records(&out.join("S1-callerX-second-concordance.vcf")), 1);
    assert_eq!(count_records(&out.join("S1-callerX-second-discordance.vcf")), 2);
    assert_eq!(count_records(&out.join("S1-second-callerX-discordance.vcf")), 1);
}

#[test]
fn test_merge_command_without_split() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let first = VcfBuilder::new("S1").hets(100, 4).write(&dir.join("a.vcf"));
    let second = VcfBuilder::new("S1").hets(100, 2).write(&dir.join("b.vcf"));

    let output = run_fgconcord(&[
        "merge",
        "-s",
        "S1",
        "-a",
        first.to_str().unwrap(),
        "-b",
        second.to_str().unwrap(),
        "-o",
        dir.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(count_records(&dir.join("S1-a-b-combine.vcf")), 4);
    assert!(!dir.join("S1-a-b-concordance.vcf").exists());
}
