use std::io::Write;

use tempfile::tempdir;

use super::*;

fn exercise_backend(backend: &dyn StorageBackend) {
    // Nothing visible before any commit
    assert!(backend.list_committed().unwrap().is_empty());

    let mut sink = backend.create("__frag_a").unwrap();
    sink.write_all(b"tile bytes").unwrap();
    sink.sync().unwrap();
    drop(sink);

    // Data and metadata alone do not make a fragment visible
    backend.put_metadata("__frag_a", b"{}").unwrap();
    assert!(backend.list_committed().unwrap().is_empty());

    backend.commit("__frag_a").unwrap();
    assert_eq!(backend.list_committed().unwrap(), vec!["__frag_a"]);

    assert_eq!(backend.read_metadata("__frag_a").unwrap(), b"{}");
    assert_eq!(backend.read_at("__frag_a", 5, 5).unwrap(), b"bytes");
    assert!(matches!(
        backend.read_at("__frag_a", 5, 100),
        Err(StorageError::OutOfBounds { .. })
    ));
    // An offset + len that wraps u64 must fail the bounds check too
    assert!(matches!(
        backend.read_at("__frag_a", u64::MAX, 2),
        Err(StorageError::OutOfBounds { .. })
    ));
}

#[test]
fn test_memory_backend_round_trip() {
    let backend = MemoryBackend::new();
    exercise_backend(&backend);
}

#[test]
fn test_directory_backend_round_trip() {
    let dir = tempdir().unwrap();
    let backend = DirectoryBackend::new(dir.path().join("array")).unwrap();
    exercise_backend(&backend);
}

#[test]
fn test_create_is_exclusive() {
    let backend = MemoryBackend::new();
    let _sink = backend.create("__frag").unwrap();
    assert!(matches!(
        backend.create("__frag"),
        Err(StorageError::AlreadyExists(_))
    ));
}

#[test]
fn test_missing_fragment_reads_fail() {
    let backend = MemoryBackend::new();
    assert!(matches!(
        backend.read_metadata("__nope"),
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        backend.read_at("__nope", 0, 1),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn test_directory_backend_uncommitted_is_invisible() {
    let dir = tempdir().unwrap();
    let backend = DirectoryBackend::new(dir.path().join("array")).unwrap();

    let mut sink = backend.create("__orphan").unwrap();
    sink.write_all(b"data").unwrap();
    sink.sync().unwrap();
    backend.put_metadata("__orphan", b"{}").unwrap();

    // Fragment directory exists on disk but is not listed
    assert!(dir.path().join("array").join("__orphan").is_dir());
    assert!(backend.list_committed().unwrap().is_empty());
}
