use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use kavvka_core::resolver::resolve;
use kavvka_core::Error;

fn canonical_root(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}

#[test]
fn test_parent_marked_folder_comes_first() {
    let tmp = tempdir().unwrap();
    let root = canonical_root(tmp.path());
    let leaf = root.join("Z").join("Bob[9]").join("leaf");
    fs::create_dir_all(leaf.join("Kid[1]")).unwrap();
    fs::create_dir_all(leaf.join("plain")).unwrap();

    let candidates = resolve(&leaf).unwrap();
    assert_eq!(
        candidates,
        vec![root.join("Z").join("Bob[9]"), leaf.join("Kid[1]")]
    );
}

#[test]
fn test_closer_ancestors_precede_farther_ones() {
    let tmp = tempdir().unwrap();
    let root = canonical_root(tmp.path());
    let leaf = root.join("Outer[1]").join("mid").join("Inner[2]").join("leaf");
    fs::create_dir_all(&leaf).unwrap();

    let candidates = resolve(&leaf).unwrap();
    assert_eq!(
        candidates,
        vec![
            root.join("Outer[1]").join("mid").join("Inner[2]"),
            root.join("Outer[1]"),
        ]
    );
}

#[test]
fn test_base_itself_is_a_candidate() {
    let tmp = tempdir().unwrap();
    let root = canonical_root(tmp.path());
    let marked = root.join("Alice[9]");
    fs::create_dir_all(marked.join("Nested[2]")).unwrap();

    let candidates = resolve(&marked).unwrap();
    assert_eq!(candidates, vec![marked.clone(), marked.join("Nested[2]")]);
}

#[test]
fn test_file_input_searches_from_parent() {
    let tmp = tempdir().unwrap();
    let root = canonical_root(tmp.path());
    let marked = root.join("art").join("Alice[9]");
    fs::create_dir_all(&marked).unwrap();
    let archive = marked.join("book1.zip");
    fs::write(&archive, b"zip").unwrap();
    // A marked *file* next to the archive is not a candidate.
    fs::write(marked.join("note[1].txt"), b"txt").unwrap();

    let candidates = resolve(&archive).unwrap();
    assert_eq!(candidates, vec![marked]);
}

#[test]
fn test_sibling_matches_all_collected() {
    let tmp = tempdir().unwrap();
    let root = canonical_root(tmp.path());
    let base = root.join("collection");
    for name in ["A[1]", "B[2]", "C(3)", "D"] {
        fs::create_dir_all(base.join(name)).unwrap();
    }

    let mut candidates = resolve(&base).unwrap();
    candidates.sort();
    assert_eq!(candidates, vec![base.join("A[1]"), base.join("B[2]")]);
}

#[test]
fn test_no_marked_folder_yields_empty_list() {
    let tmp = tempdir().unwrap();
    let root = canonical_root(tmp.path());
    let base = root.join("plain").join("deeper");
    fs::create_dir_all(base.join("child")).unwrap();

    assert!(resolve(&base).unwrap().is_empty());
}

#[test]
fn test_unreadable_base_is_resolution_error() {
    let tmp = tempdir().unwrap();
    let root = canonical_root(tmp.path());
    let missing = root.join("Gone[1]").join("missing");

    match resolve(&missing) {
        Err(Error::Resolution { path, .. }) => assert_eq!(path, missing),
        other => panic!("Unexpected result: {:?}", other),
    }
}
