use dupseq::config::Config;
use dupseq::pipeline::{Deduplicator, Policy};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn pairs_config() -> Config {
    Config {
        policy: Policy::Pairing,
        ..Config::default()
    }
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
fn test_pairs_removes_even_positions() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("DSC01.webp", "orig 1"),
        ("DSC01_edit.webp", "edit 1"),
        ("DSC02.webp", "orig 2"),
        ("DSC02_edit.webp", "edit 2"),
        ("DSC03.webp", "orig 3"),
    ] {
        fs::write(dir.path().join(name), content).unwrap();
    }

    let summary = Deduplicator::new(pairs_config()).run(dir.path()).unwrap();

    assert_eq!(summary.total_files, 5);
    assert_eq!(summary.deleted, 2);
    assert!(summary.digest.is_none());
    assert_eq!(
        listing(dir.path()),
        vec!["foto0001.webp", "foto0002.webp", "foto0003.webp"]
    );
    for (name, content) in [
        ("foto0001.webp", "orig 1"),
        ("foto0002.webp", "orig 2"),
        ("foto0003.webp", "orig 3"),
    ] {
        assert_eq!(fs::read_to_string(dir.path().join(name)).unwrap(), content);
    }
}

#[test]
fn test_pairs_ignores_content() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.webp"), "same").unwrap();
    fs::write(dir.path().join("b.webp"), "different").unwrap();
    fs::write(dir.path().join("c.webp"), "same").unwrap();

    let summary = Deduplicator::new(pairs_config()).run(dir.path()).unwrap();

    assert_eq!(summary.duplicates.len(), 1);
    assert_eq!(summary.duplicates[0].path, dir.path().join("b.webp"));
    assert_eq!(summary.duplicates[0].original, dir.path().join("a.webp"));
}

#[test]
fn test_pairs_dry_run_changes_nothing() {
    let dir = tempdir().unwrap();
    for name in ["1.webp", "2.webp", "3.webp", "4.webp"] {
        fs::write(dir.path().join(name), name).unwrap();
    }
    let config = Config {
        dry_run: true,
        ..pairs_config()
    };

    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(summary.duplicate_count(), 2);
    assert_eq!(summary.renames.len(), 2);
    assert_eq!(
        listing(dir.path()),
        vec!["1.webp", "2.webp", "3.webp", "4.webp"]
    );
}
