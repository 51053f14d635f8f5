use crate::schema::{ArraySchema, Datatype, Dimension};

use super::*;

fn test_schema() -> ArraySchema {
    ArraySchema::builder("grid")
        .dimension(Dimension::with_extent("d1", 1, 4, 2))
        .dimension(Dimension::with_extent("d2", 1, 4, 2))
        .attribute("a1", Datatype::Int32)
        .attribute_var("a2", Datatype::Char)
        .attribute_fixed("a3", Datatype::Float32, 2)
        .capacity(2)
        .build()
        .unwrap()
}

fn i32_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn full_buffer_set<'a>(
    schema: &ArraySchema,
    coords: &'a [u64],
    a1: &'a [u8],
    a2_offsets: &'a [u64],
    a2_values: &'a [u8],
    a3: &'a [u8],
) -> BufferSet<'a> {
    let mut buffers = BufferSet::new();
    buffers.set_coords(coords);
    buffers.set_fixed(schema, "a1", a1).unwrap();
    buffers.set_var(schema, "a2", a2_offsets, a2_values).unwrap();
    buffers.set_fixed(schema, "a3", a3).unwrap();
    buffers
}

#[test]
fn test_build_batch_from_valid_buffers() {
    let schema = test_schema();
    let coords = [3u64, 4, 4, 2, 1, 1];
    let a1 = i32_bytes(&[7, 5, 0]);
    let a2_offsets = [0u64, 4, 6];
    let a2_values = b"hhhhffa";
    let a3 = f32_bytes(&[7.1, 7.2, 5.1, 5.2, 0.1, 0.2]);

    let buffers = full_buffer_set(&schema, &coords, &a1, &a2_offsets, a2_values, &a3);
    let batch = build_batch(&schema, &buffers).unwrap();

    assert_eq!(batch.cell_count(), 3);
    assert_eq!(batch.coords(0), &[3, 4]);
    assert_eq!(batch.coords(2), &[1, 1]);

    // Var-length cell runs derive from consecutive offsets; the last cell
    // runs to the end of the values buffer.
    let a2 = &batch.columns()[1];
    assert_eq!(a2.cell_bytes(0), b"hhhh");
    assert_eq!(a2.cell_bytes(1), b"ff");
    assert_eq!(a2.cell_bytes(2), b"a");

    let a3_col = &batch.columns()[2];
    assert_eq!(a3_col.cell_bytes(1), f32_bytes(&[5.1, 5.2]).as_slice());
}

#[test]
fn test_missing_buffer_is_incomplete() {
    let schema = test_schema();
    let coords = [1u64, 1];
    let a1 = i32_bytes(&[0]);

    let mut buffers = BufferSet::new();
    buffers.set_coords(&coords);
    buffers.set_fixed(&schema, "a1", &a1).unwrap();

    let err = build_batch(&schema, &buffers).unwrap_err();
    assert!(matches!(err, BufferError::IncompleteBufferSet(ref f) if f == "a2"));
}

#[test]
fn test_missing_coords_is_incomplete() {
    let schema = test_schema();
    let buffers = BufferSet::new();
    let err = build_batch(&schema, &buffers).unwrap_err();
    assert!(matches!(err, BufferError::IncompleteBufferSet(_)));
}

#[test]
fn test_unknown_field_rejected_at_set_time() {
    let schema = test_schema();
    let mut buffers = BufferSet::new();
    let err = buffers.set_fixed(&schema, "nope", &[]).unwrap_err();
    assert!(matches!(err, BufferError::UnknownField(_)));
}

#[test]
fn test_var_attribute_rejects_fixed_setter() {
    let schema = test_schema();
    let mut buffers = BufferSet::new();
    let err = buffers.set_fixed(&schema, "a2", &[]).unwrap_err();
    assert!(matches!(err, BufferError::SchemaMismatch { .. }));

    let err = buffers.set_var(&schema, "a1", &[], &[]).unwrap_err();
    assert!(matches!(err, BufferError::SchemaMismatch { .. }));
}

#[test]
fn test_cell_count_mismatch() {
    let schema = test_schema();
    let coords = [1u64, 1, 2, 2];
    let a1 = i32_bytes(&[1]); // one cell, coords describe two
    let a2_offsets = [0u64, 1];
    let a2_values = b"xy";
    let a3 = f32_bytes(&[0.0; 4]);

    let buffers = full_buffer_set(&schema, &coords, &a1, &a2_offsets, a2_values, &a3);
    let err = build_batch(&schema, &buffers).unwrap_err();
    assert!(
        matches!(err, BufferError::CellCountMismatch { ref field, expected: 2, actual: 1 } if field == "a1")
    );
}

#[test]
fn test_ragged_fixed_buffer_is_schema_mismatch() {
    let schema = test_schema();
    let coords = [1u64, 1];
    let a1 = vec![0u8; 5]; // not a multiple of 4
    let a2_offsets = [0u64];
    let a2_values = b"x";
    let a3 = f32_bytes(&[0.0; 2]);

    let buffers = full_buffer_set(&schema, &coords, &a1, &a2_offsets, a2_values, &a3);
    let err = build_batch(&schema, &buffers).unwrap_err();
    assert!(matches!(err, BufferError::SchemaMismatch { ref field, .. } if field == "a1"));
}

#[test]
fn test_non_monotonic_offsets_are_corrupted() {
    let schema = test_schema();
    let coords = [1u64, 1, 2, 2];
    let a1 = i32_bytes(&[1, 2]);
    let a2_offsets = [0u64, 5]; // 5 > values length
    let a2_values = b"abc";
    let a3 = f32_bytes(&[0.0; 4]);

    let buffers = full_buffer_set(&schema, &coords, &a1, &a2_offsets, a2_values, &a3);
    let err = build_batch(&schema, &buffers).unwrap_err();
    assert!(matches!(err, BufferError::CorruptedOffsets { .. }));

    let a2_decreasing = [2u64, 0];
    let buffers = full_buffer_set(&schema, &coords, &a1, &a2_decreasing, a2_values, &a3);
    let err = build_batch(&schema, &buffers).unwrap_err();
    assert!(matches!(err, BufferError::CorruptedOffsets { .. }));
}

#[test]
fn test_out_of_domain_coords_rejected() {
    let schema = test_schema();
    let coords = [9u64, 1];
    let a1 = i32_bytes(&[1]);
    let a2_offsets = [0u64];
    let a2_values = b"x";
    let a3 = f32_bytes(&[0.0; 2]);

    let buffers = full_buffer_set(&schema, &coords, &a1, &a2_offsets, a2_values, &a3);
    let err = build_batch(&schema, &buffers).unwrap_err();
    assert!(
        matches!(err, BufferError::SchemaMismatch { ref field, .. } if field == crate::schema::COORDS_FIELD)
    );
}

#[test]
fn test_empty_batch_is_valid() {
    let schema = test_schema();
    let buffers = full_buffer_set(&schema, &[], &[], &[], &[], &[]);
    let batch = build_batch(&schema, &buffers).unwrap();
    assert!(batch.is_empty());
}
