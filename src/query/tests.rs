use std::sync::Arc;

use crate::buffer::BufferError;
use crate::fragment::FragmentMetadata;
use crate::layout::{Layout, LayoutError};
use crate::schema::{ArraySchema, Datatype, Dimension};
use crate::storage::{MemoryBackend, StorageBackend};

use super::*;

fn test_schema() -> Arc<ArraySchema> {
    Arc::new(
        ArraySchema::builder("grid")
            .dimension(Dimension::with_extent("d1", 1, 4, 2))
            .dimension(Dimension::with_extent("d2", 1, 4, 2))
            .attribute("a1", Datatype::Int32)
            .attribute_var("a2", Datatype::Char)
            .capacity(2)
            .build()
            .unwrap(),
    )
}

fn test_array(backend: &MemoryBackend) -> Array {
    Array::new(test_schema(), Arc::new(backend.clone()))
}

fn i32_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[test]
fn test_unordered_submissions_commit_one_fragment_each() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let coords_1 = [3u64, 4, 4, 2, 1, 1];
    let a1_1 = i32_bytes(&[7, 5, 0]);
    let a2_off_1 = [0u64, 4, 6];
    let coords_2 = [3u64, 3, 3, 1, 2, 3, 1, 2, 1, 4];
    let a1_2 = i32_bytes(&[6, 4, 3, 1, 2]);
    let a2_off_2 = [0u64, 3, 4, 8, 10];
    let mut query = array.open_write(Layout::Unordered);

    query.set_coords(&coords_1).unwrap();
    query.set_buffer("a1", &a1_1).unwrap();
    query.set_buffer_var("a2", &a2_off_1, b"hhhhffa").unwrap();
    query.submit().unwrap();
    assert_eq!(backend.list_committed().unwrap().len(), 1);

    query.set_coords(&coords_2).unwrap();
    query.set_buffer("a1", &a1_2).unwrap();
    query.set_buffer_var("a2", &a2_off_2, b"gggeddddbbccc").unwrap();
    query.submit().unwrap();

    let stats = query.finalize().unwrap();
    assert_eq!(stats.fragments.len(), 2);
    assert_eq!(stats.cells_written, 8);
    assert_eq!(stats.submissions, 2);
    let mut expected = stats.fragments.clone();
    expected.sort();
    assert_eq!(backend.list_committed().unwrap(), expected);

    let meta_1 =
        FragmentMetadata::from_bytes(&backend.read_metadata(&stats.fragments[0]).unwrap()).unwrap();
    let meta_2 =
        FragmentMetadata::from_bytes(&backend.read_metadata(&stats.fragments[1]).unwrap()).unwrap();
    assert_eq!(meta_1.cell_count, 3);
    assert_eq!(meta_2.cell_count, 5);
}

#[test]
fn test_global_order_accumulates_into_one_fragment() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    // (1,1) then (2,2) then, next submission, (3,3) then (3,4): global
    // order within and across submissions
    let coords_1 = [1u64, 1, 2, 2];
    let a1_1 = i32_bytes(&[10, 20]);
    let a2_off_1 = [0u64, 1];
    let coords_2 = [3u64, 3, 3, 4];
    let a1_2 = i32_bytes(&[30, 40]);
    let a2_off_2 = [0u64, 2];
    let mut query = array.open_write(Layout::GlobalOrder);

    query.set_coords(&coords_1).unwrap();
    query.set_buffer("a1", &a1_1).unwrap();
    query.set_buffer_var("a2", &a2_off_1, b"xy").unwrap();
    query.submit().unwrap();

    // Nothing committed until finalize
    assert!(backend.list_committed().unwrap().is_empty());

    query.set_coords(&coords_2).unwrap();
    query.set_buffer("a1", &a1_2).unwrap();
    query.set_buffer_var("a2", &a2_off_2, b"abcd").unwrap();
    query.submit().unwrap();

    let stats = query.finalize().unwrap();
    assert_eq!(stats.fragments.len(), 1);
    assert_eq!(stats.cells_written, 4);
    assert_eq!(backend.list_committed().unwrap(), stats.fragments);

    let meta =
        FragmentMetadata::from_bytes(&backend.read_metadata(&stats.fragments[0]).unwrap()).unwrap();
    assert_eq!(meta.cell_count, 4);
    assert_eq!(meta.tile_count(), 2);
}

#[test]
fn test_global_order_violation_across_submissions() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let coords_1 = [3u64, 3];
    let a1_1 = i32_bytes(&[1]);
    let a2_off = [0u64];
    let coords_2 = [1u64, 1];
    let mut query = array.open_write(Layout::GlobalOrder);

    query.set_coords(&coords_1).unwrap();
    query.set_buffer("a1", &a1_1).unwrap();
    query.set_buffer_var("a2", &a2_off, b"x").unwrap();
    query.submit().unwrap();

    // (1,1) precedes (3,3) in global order, so this submission regresses
    query.set_coords(&coords_2).unwrap();
    let err = query.submit().unwrap_err();
    assert!(matches!(
        err,
        QueryError::Layout(LayoutError::OrderViolation { position: 0 })
    ));
}

#[test]
fn test_submit_without_buffers_is_incomplete() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let coords = [1u64, 1];
    let mut query = array.open_write(Layout::Unordered);

    query.set_coords(&coords).unwrap();
    let err = query.submit().unwrap_err();
    assert!(matches!(
        err,
        QueryError::Buffer(BufferError::IncompleteBufferSet(_))
    ));
    // A failed submission commits nothing
    assert!(backend.list_committed().unwrap().is_empty());
}

#[test]
fn test_submit_after_finalize_is_sealed() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let mut query = array.open_write(Layout::Unordered);

    query.finalize().unwrap();
    let err = query.submit().unwrap_err();
    assert!(matches!(err, QueryError::FragmentSealed));

    // Buffer attachment is rejected too once the query is sealed
    assert!(matches!(
        query.set_coords(&[]),
        Err(QueryError::FragmentSealed)
    ));
    assert!(matches!(
        query.set_buffer("a1", &[]),
        Err(QueryError::FragmentSealed)
    ));
}

#[test]
fn test_double_finalize_fails() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let mut query = array.open_write(Layout::GlobalOrder);

    query.finalize().unwrap();
    let err = query.finalize().unwrap_err();
    assert!(matches!(err, QueryError::AlreadyFinalized));
}

#[test]
fn test_dropped_query_discards_accumulated_cells() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let coords = [1u64, 1];
    let a1 = i32_bytes(&[1]);
    let a2_off = [0u64];
    let mut query = array.open_write(Layout::GlobalOrder);

    query.set_coords(&coords).unwrap();
    query.set_buffer("a1", &a1).unwrap();
    query.set_buffer_var("a2", &a2_off, b"x").unwrap();
    query.submit().unwrap();
    drop(query);

    assert!(backend.list_committed().unwrap().is_empty());
}

#[test]
fn test_close_discards_like_drop() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let coords = [2u64, 2];
    let a1 = i32_bytes(&[5]);
    let a2_off = [0u64];
    let mut query = array.open_write(Layout::GlobalOrder);

    query.set_coords(&coords).unwrap();
    query.set_buffer("a1", &a1).unwrap();
    query.set_buffer_var("a2", &a2_off, b"q").unwrap();
    query.submit().unwrap();
    query.close();

    assert!(backend.list_committed().unwrap().is_empty());
}

#[test]
fn test_empty_submission_writes_no_fragment() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let mut query = array.open_write(Layout::Unordered);

    query.set_coords(&[]).unwrap();
    query.set_buffer("a1", &[]).unwrap();
    query.set_buffer_var("a2", &[], &[]).unwrap();
    query.submit().unwrap();

    let stats = query.finalize().unwrap();
    assert!(stats.fragments.is_empty());
    assert_eq!(stats.cells_written, 0);
    assert_eq!(stats.submissions, 1);
}

#[test]
fn test_unknown_attribute_rejected_at_attach() {
    let backend = MemoryBackend::new();
    let array = test_array(&backend);
    let mut query = array.open_write(Layout::Unordered);

    let err = query.set_buffer("nope", &[]).unwrap_err();
    assert!(matches!(err, QueryError::Buffer(BufferError::UnknownField(_))));
}
