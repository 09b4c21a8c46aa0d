use dupseq::config::Config;
use dupseq::pipeline::{Deduplicator, Stage};
use dupseq::scanner::DigestAlgorithm;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_dedup_empty_directory() {
    let dir = tempdir().unwrap();

    let summary = Deduplicator::new(Config::default()).run(dir.path()).unwrap();

    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_count(), 0);
    assert!(summary.renames.is_empty());
}

#[test]
fn test_dedup_distinct_contents_keeps_everything() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x.webp", "1");
    write(dir.path(), "y.webp", "2");
    write(dir.path(), "z.webp", "3");

    let summary = Deduplicator::new(Config::default()).run(dir.path()).unwrap();

    assert_eq!(summary.unique_files, 3);
    assert_eq!(summary.deleted, 0);
    assert_eq!(
        listing(dir.path()),
        vec!["foto0001.webp", "foto0002.webp", "foto0003.webp"]
    );
    assert_eq!(read(dir.path(), "foto0003.webp"), "3");
}

#[test]
fn test_dedup_keeps_lexicographically_first_copy() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b.webp", "X");
    write(dir.path(), "a.webp", "X");
    write(dir.path(), "c.webp", "Y");

    let mut dedup = Deduplicator::new(Config::default());
    let summary = dedup.run(dir.path()).unwrap();

    assert_eq!(dedup.stage(), Stage::Done);
    assert_eq!(summary.duplicates.len(), 1);
    assert_eq!(summary.duplicates[0].path, dir.path().join("b.webp"));
    assert_eq!(summary.duplicates[0].original, dir.path().join("a.webp"));

    let renames: Vec<(String, String)> = summary
        .renames
        .iter()
        .map(|op| (op.from_name(), op.to_name()))
        .collect();
    assert_eq!(
        renames,
        vec![
            ("a.webp".to_string(), "foto0001.webp".to_string()),
            ("c.webp".to_string(), "foto0002.webp".to_string()),
        ]
    );
    assert_eq!(listing(dir.path()), vec!["foto0001.webp", "foto0002.webp"]);
}

#[test]
fn test_dedup_ignores_non_matching_files_and_subdirectories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.webp", "X");
    write(dir.path(), "a.jpg", "X");
    fs::create_dir(dir.path().join("nested.webp")).unwrap();
    write(&dir.path().join("nested.webp"), "b.webp", "X");

    let summary = Deduplicator::new(Config::default()).run(dir.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert_eq!(summary.duplicate_count(), 0);
    assert_eq!(
        listing(dir.path()),
        vec!["a.jpg", "foto0001.webp", "nested.webp"]
    );
    assert!(dir.path().join("nested.webp").join("b.webp").exists());
}

#[test]
fn test_dedup_sha256_finds_same_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.webp", "same");
    write(dir.path(), "b.webp", "same");
    let config = Config {
        digest: DigestAlgorithm::Sha256,
        chunk_size: 3,
        renumber: false,
        ..Config::default()
    };

    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(summary.digest, Some(DigestAlgorithm::Sha256));
    assert_eq!(summary.deleted, 1);
    assert_eq!(listing(dir.path()), vec!["a.webp"]);
}

#[test]
fn test_dedup_custom_pattern_prefix_and_width() {
    let dir = tempdir().unwrap();
    write(dir.path(), "IMG_2.jpg", "2");
    write(dir.path(), "IMG_1.jpg", "1");
    write(dir.path(), "IMG_3.jpg", "1");
    let config = Config {
        pattern: "IMG_*.jpg".to_string(),
        prefix: "fiesta".to_string(),
        pad_width: 2,
        ..Config::default()
    };

    Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(listing(dir.path()), vec!["fiesta01.jpg", "fiesta02.jpg"]);
    assert_eq!(read(dir.path(), "fiesta01.jpg"), "1");
    assert_eq!(read(dir.path(), "fiesta02.jpg"), "2");
}

#[test]
fn test_dedup_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.webp", "X");
    write(dir.path(), "b.webp", "X");
    write(dir.path(), "c.webp", "Y");
    write(dir.path(), "d.webp", "Y");
    write(dir.path(), "e.webp", "Z");

    let first = Deduplicator::new(Config::default()).run(dir.path()).unwrap();
    let after_first = listing(dir.path());
    let second = Deduplicator::new(Config::default()).run(dir.path()).unwrap();

    assert_eq!(first.deleted, 2);
    assert_eq!(second.duplicate_count(), 0);
    assert!(second.renames.is_empty());
    assert_eq!(listing(dir.path()), after_first);
}

#[test]
fn test_dedup_trash_mode_reports_result() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.webp", "X");
    write(dir.path(), "b.webp", "X");
    let config = Config {
        trash: true,
        renumber: false,
        ..Config::default()
    };

    // The trash may be unavailable in CI; either outcome must be recorded.
    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(summary.deleted + summary.delete_failures.len(), 1);
    assert!(dir.path().join("a.webp").exists());
}
