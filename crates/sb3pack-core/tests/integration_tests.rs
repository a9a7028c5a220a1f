//! Integration tests for sb3pack-core.
//!
//! These tests run the full discover → package → write pipeline against real
//! directory trees.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sb3pack_core::BatchConfig;
use sb3pack_core::FailurePolicy;
use sb3pack_core::NoopProgress;
use sb3pack_core::OutputLayout;
use sb3pack_core::PackError;
use sb3pack_core::Preset;
use sb3pack_core::discover;
use sb3pack_core::run_batch;
use sb3pack_core::test_utils::FakePackager;
use sb3pack_core::test_utils::RecordingProgress;
use sb3pack_core::test_utils::list_files;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_projects(root: &Path, files: &[&str]) {
    for rel in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, rel.as_bytes()).unwrap();
    }
}

#[test]
fn test_mirrored_scenario() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_projects(src.path(), &["a/proj1.sb3", "b/c/proj2.sb3"]);

    let sources = discover(src.path(), "sb3").unwrap();
    assert_eq!(sources.len(), 2);
    assert!(sources.iter().all(|s| s.path().is_absolute()));

    let config = BatchConfig::new(src.path()).with_dest_root(out.path().join("out"));
    let report = run_batch(&sources, &config, &FakePackager::new(), &mut NoopProgress);

    assert!(report.is_success());
    assert!(out.path().join("out/a/proj1/proj1.html").is_file());
    assert!(out.path().join("out/b/c/proj2/proj2.html").is_file());
}

#[test]
fn test_in_place_conversion_matches_script_behavior() {
    let src = TempDir::new().unwrap();
    write_projects(src.path(), &["games/pong.sb3"]);

    let config = BatchConfig::new(src.path());
    let sources = discover(&config.source_root, &config.extension).unwrap();
    let report = run_batch(&sources, &config, &FakePackager::new(), &mut NoopProgress);

    assert!(report.is_success());
    assert_eq!(
        list_files(src.path()),
        vec![
            "games/pong.sb3",
            "games/pong/assets/project.json",
            "games/pong/pong.html"
        ]
    );
}

#[test]
fn test_rerun_in_place_discovers_only_projects() {
    let src = TempDir::new().unwrap();
    write_projects(src.path(), &["pong.sb3"]);
    let config = BatchConfig::new(src.path());

    for _ in 0..2 {
        let sources = discover(&config.source_root, &config.extension).unwrap();
        assert_eq!(sources.len(), 1);
        let report = run_batch(&sources, &config, &FakePackager::new(), &mut NoopProgress);
        assert!(report.is_success());
    }

    assert_eq!(
        list_files(src.path()),
        vec!["pong.sb3", "pong/assets/project.json", "pong/pong.html"]
    );
}

#[test]
fn test_single_file_mode_never_creates_directories() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_projects(src.path(), &["one.sb3", "nested/two.sb3", "nested/deeper/three.sb3"]);

    let config = BatchConfig::new(src.path())
        .with_dest_root(out.path())
        .with_layout(OutputLayout::SingleFile)
        .with_preset(Preset::HtmlResizable);
    let sources = discover(src.path(), "sb3").unwrap();
    let report = run_batch(&sources, &config, &FakePackager::new(), &mut NoopProgress);

    assert_eq!(report.succeeded(), 3);
    assert_eq!(
        list_files(out.path()),
        vec!["one.html", "three.html", "two.html"]
    );
    let dirs = fs::read_dir(out.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().file_type().unwrap().is_dir())
        .count();
    assert_eq!(dirs, 0);
}

#[test]
fn test_flat_folder_mode_creates_populated_folder_per_input() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_projects(src.path(), &["x/alpha.sb3", "y/z/beta.sb3"]);

    let config = BatchConfig::new(src.path())
        .with_dest_root(out.path())
        .with_layout(OutputLayout::FlatFolder);
    let sources = discover(src.path(), "sb3").unwrap();
    let report = run_batch(&sources, &config, &FakePackager::new(), &mut NoopProgress);

    assert!(report.is_success());
    for base in ["alpha", "beta"] {
        let folder = out.path().join(base);
        assert!(folder.is_dir());
        assert!(!list_files(&folder).is_empty());
    }
}

#[test]
fn test_one_failure_of_three_under_continue() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_projects(src.path(), &["a.sb3", "c.sb3"]);
    fs::write(src.path().join("b.sb3"), b"FAIL").unwrap();

    let config = BatchConfig::new(src.path())
        .with_dest_root(out.path())
        .with_failure_policy(FailurePolicy::Continue);
    let sources = discover(src.path(), "sb3").unwrap();
    let mut progress = RecordingProgress::default();
    let report = run_batch(&sources, &config, &FakePackager::new(), &mut progress);

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_success());
    assert_eq!(progress.succeeded.len(), 2);
    let failure = report.failures().next().unwrap();
    assert!(failure.source.ends_with("b.sb3"));
    assert!(failure.error().unwrap().contains("packaging failed"));
}

#[test]
fn test_unreadable_project_is_per_file_failure() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_projects(src.path(), &["gone.sb3", "kept.sb3"]);

    let sources = discover(src.path(), "sb3").unwrap();
    fs::remove_file(src.path().join("gone.sb3")).unwrap();

    let config = BatchConfig::new(src.path()).with_dest_root(out.path());
    let report = run_batch(&sources, &config, &FakePackager::new(), &mut NoopProgress);

    assert_eq!(report.failed(), 1);
    assert!(report.outcomes[0].error().unwrap().contains("cannot read project"));
    assert!(report.outcomes[1].succeeded());
}

#[test]
fn test_missing_source_root() {
    let temp = TempDir::new().unwrap();
    let err = discover(temp.path().join("sb3"), "sb3").unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, PackError::Discovery { .. }));
}
