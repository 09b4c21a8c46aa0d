use dupseq::actions::{renumber, RenameError};
use dupseq::config::Config;
use dupseq::pipeline::{Deduplicator, Policy};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_renumber_never_overwrites_existing_target() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.webp"), "content of a").unwrap();
    fs::write(dir.path().join("foto0001.webp"), "content of foto0001").unwrap();

    let outcome = renumber(dir.path(), "*.webp", "foto", 4).unwrap();

    assert!(outcome.failures.is_empty());
    assert_eq!(read(dir.path(), "foto0001.webp"), "content of a");
    assert_eq!(read(dir.path(), "foto0002.webp"), "content of foto0001");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_renumber_reverses_overlapping_sequence() {
    let dir = tempdir().unwrap();
    // Sorted order a < foto0001 < foto0002 shifts every file up by one.
    fs::write(dir.path().join("a.webp"), "A").unwrap();
    fs::write(dir.path().join("foto0001.webp"), "1").unwrap();
    fs::write(dir.path().join("foto0002.webp"), "2").unwrap();

    let outcome = renumber(dir.path(), "*.webp", "foto", 4).unwrap();

    assert_eq!(outcome.renamed.len(), 3);
    assert_eq!(read(dir.path(), "foto0001.webp"), "A");
    assert_eq!(read(dir.path(), "foto0002.webp"), "1");
    assert_eq!(read(dir.path(), "foto0003.webp"), "2");
    let leftovers = fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with('.')
        })
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_renumber_keeps_each_files_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.WEBP"), "A").unwrap();
    fs::write(dir.path().join("b.webp"), "B").unwrap();

    renumber(dir.path(), "*.{webp,WEBP}", "foto", 4).unwrap();

    assert_eq!(read(dir.path(), "foto0001.WEBP"), "A");
    assert_eq!(read(dir.path(), "foto0002.webp"), "B");
}

#[test]
fn test_renumber_rejects_foreign_target_without_changes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("IMG_1.webp"), "1").unwrap();
    fs::write(dir.path().join("foto0001.webp"), "unrelated").unwrap();

    let err = renumber(dir.path(), "IMG_*.webp", "foto", 4).unwrap_err();

    assert!(matches!(err, RenameError::TargetExists(_)));
    assert_eq!(read(dir.path(), "IMG_1.webp"), "1");
    assert_eq!(read(dir.path(), "foto0001.webp"), "unrelated");
}

#[test]
fn test_renumber_policy_removes_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.webp"), "X").unwrap();
    fs::write(dir.path().join("b.webp"), "X").unwrap();
    let config = Config {
        policy: Policy::None,
        ..Config::default()
    };

    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(summary.duplicate_count(), 0);
    assert_eq!(summary.renames.len(), 2);
    assert_eq!(read(dir.path(), "foto0001.webp"), "X");
    assert_eq!(read(dir.path(), "foto0002.webp"), "X");
}

#[test]
fn test_renumber_beyond_pad_width_still_unique() {
    let dir = tempdir().unwrap();
    for i in 0..12 {
        fs::write(dir.path().join(format!("f{i:02}.webp")), i.to_string()).unwrap();
    }

    let outcome = renumber(dir.path(), "*.webp", "p", 1).unwrap();

    assert_eq!(outcome.renamed.len(), 12);
    assert_eq!(read(dir.path(), "p9.webp"), "8");
    assert_eq!(read(dir.path(), "p12.webp"), "11");
}
