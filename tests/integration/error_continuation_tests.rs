use dupseq::actions::{purge, DeleteConfig};
use dupseq::config::Config;
use dupseq::pipeline::{Deduplicator, PipelineError};
use dupseq::scanner::{scan_paths, ReadError, ScanConfig, ScanError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_scan_paths_continues_on_read_error() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("a.webp");
    fs::write(&present, "X").unwrap();
    let missing = dir.path().join("missing.webp");

    let outcome = scan_paths(&[missing.clone(), present.clone()], &ScanConfig::default());

    assert_eq!(outcome.listed, 2);
    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].path, present);
    match &outcome.errors[..] {
        [ReadError::NotFound(path)] => assert_eq!(path, &missing),
        other => panic!("Expected one NotFound ReadError, got: {:?}", other),
    }
}

#[test]
fn test_purge_reports_requested_versus_actual() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.webp");
    fs::write(&a, "12345").unwrap();
    let gone = dir.path().join("gone.webp");

    let result = purge(&[gone.clone(), a.clone()], &DeleteConfig::default());

    assert_eq!(result.requested_count(), 2);
    assert_eq!(result.success_count(), 1);
    assert_eq!(result.bytes_freed, 5);
    assert_eq!(result.failures[0].path, gone);
    assert!(!a.exists());
}

#[test]
fn test_missing_directory_fails_before_anything() {
    let dir = tempdir().unwrap();

    let err = Deduplicator::new(Config::default())
        .run(&dir.path().join("nope"))
        .unwrap_err();

    assert!(matches!(err, PipelineError::Scan(ScanError::DirectoryNotFound(_))));
    assert!(err.is_directory_error());
}

#[test]
fn test_file_instead_of_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.webp");
    fs::write(&file, "X").unwrap();

    let err = Deduplicator::new(Config::default()).run(&file).unwrap_err();

    assert!(matches!(err, PipelineError::Scan(ScanError::NotADirectory(_))));
    assert!(err.is_directory_error());
}

#[test]
fn test_invalid_pattern_is_fatal() {
    let dir = tempdir().unwrap();
    let config = Config {
        pattern: "[unclosed".to_string(),
        ..Config::default()
    };

    let err = Deduplicator::new(config).run(dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::Scan(ScanError::InvalidPattern { .. })));
    assert!(!err.is_directory_error());
}

#[test]
fn test_foreign_target_aborts_before_purge() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("IMG_a.webp"), "X").unwrap();
    fs::write(dir.path().join("IMG_b.webp"), "X").unwrap();
    fs::write(dir.path().join("foto0001.webp"), "unrelated").unwrap();
    let config = Config {
        pattern: "IMG_*.webp".to_string(),
        ..Config::default()
    };

    let err = Deduplicator::new(config).run(dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::Rename(_)));
    assert!(dir.path().join("IMG_a.webp").exists());
    assert!(dir.path().join("IMG_b.webp").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("foto0001.webp")).unwrap(),
        "unrelated"
    );
}
