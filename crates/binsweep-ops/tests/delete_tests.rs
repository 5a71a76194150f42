//! End-to-end deletion tests: scan, group, delete, verify.

use std::fs;

use tempfile::TempDir;

use binsweep_analyze::DuplicateFinder;
use binsweep_ops::delete_files;
use binsweep_scan::{ScanConfig, Scanner};

#[test]
fn deleting_duplicate_candidates_keeps_the_retained_copy() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::write(root.join("a.txt"), "same bytes").unwrap();
    fs::write(root.join("b.txt"), "same bytes").unwrap();
    fs::write(root.join("c.txt"), "other bytes").unwrap();

    let inventory = Scanner::new().scan(&ScanConfig::new(root)).unwrap();
    assert_eq!(inventory.len(), 3);

    let report = DuplicateFinder::new().find_duplicates(&inventory);
    assert_eq!(report.group_count(), 1);
    assert_eq!(report.groups[0].count(), 2);

    let candidates = report.deletion_candidates();
    assert_eq!(candidates.len(), 1);

    // The retained copy is never in the candidate list.
    let retained = report.groups[0].retained().path.clone();
    assert!(candidates.iter().all(|p| *p != retained));

    let delete_report = delete_files(&candidates);
    assert!(delete_report.is_success());
    assert_eq!(delete_report.succeeded, 1);

    // a.txt survives, b.txt is gone, c.txt untouched.
    assert!(root.join("a.txt").exists());
    assert!(!root.join("b.txt").exists());
    assert!(root.join("c.txt").exists());
}

#[test]
fn every_group_keeps_at_least_one_member_on_disk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    for group in ["alpha", "beta", "gamma"] {
        for i in 0..3 {
            fs::write(root.join(format!("{group}{i}.dat")), group).unwrap();
        }
    }

    let inventory = Scanner::new().scan(&ScanConfig::new(root)).unwrap();
    let report = DuplicateFinder::new().find_duplicates(&inventory);
    assert_eq!(report.group_count(), 3);

    let delete_report = delete_files(&report.deletion_candidates());
    assert!(delete_report.is_success());
    assert_eq!(delete_report.succeeded, 6);

    for group in &report.groups {
        assert!(group.retained().path.exists());
    }
}

#[test]
fn partial_failure_leaves_other_outcomes_intact() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let present = root.join("present.txt");
    let missing = root.join("missing.txt");
    fs::write(&present, "here").unwrap();

    let report = delete_files(&[missing.clone(), present.clone()]);

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert!(!report.is_success());
    assert!(!present.exists());

    let failed: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| !o.succeeded())
        .map(|o| o.path.clone())
        .collect();
    assert_eq!(failed, vec![missing]);
}
