use std::collections::HashMap;

use crate::schema::{ArraySchema, CellValNum, COORDS_FIELD};

use super::error::BufferError;

/// Borrowed read-only view of one field's caller buffers.
///
/// The view is valid for the lifetime of the caller's buffers; the write
/// core never mutates them and drops the view when the submission returns.
#[derive(Debug, Clone, Copy)]
pub enum FieldBuffer<'a> {
    /// Interleaved coordinates, one `u64` per dimension per cell
    Coords(&'a [u64]),
    /// Fixed-length attribute values, raw bytes
    Fixed(&'a [u8]),
    /// Variable-length attribute: per-cell starting byte offsets into the
    /// values buffer, plus the flat values buffer itself
    Var {
        /// Non-decreasing per-cell starting offsets, in bytes
        offsets: &'a [u64],
        /// Flat values buffer
        values: &'a [u8],
    },
}

/// The set of buffers a caller has attached for the next submission.
///
/// Buffers may be re-set between submissions; setting a field twice
/// replaces the earlier view.
#[derive(Debug, Default)]
pub struct BufferSet<'a> {
    fields: HashMap<String, FieldBuffer<'a>>,
}

impl<'a> BufferSet<'a> {
    /// Create an empty buffer set
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the interleaved coordinates buffer
    pub fn set_coords(&mut self, coords: &'a [u64]) {
        self.fields
            .insert(COORDS_FIELD.to_string(), FieldBuffer::Coords(coords));
    }

    /// Attach a fixed-length attribute's values buffer.
    ///
    /// Fails with [`BufferError::UnknownField`] if the schema does not
    /// declare the attribute, or [`BufferError::SchemaMismatch`] if the
    /// attribute is variable-length (those need [`Self::set_var`]).
    pub fn set_fixed(
        &mut self,
        schema: &ArraySchema,
        name: &str,
        data: &'a [u8],
    ) -> Result<(), BufferError> {
        let attr = schema
            .attribute(name)
            .ok_or_else(|| BufferError::UnknownField(name.to_string()))?;
        if attr.cell_val_num == CellValNum::Var {
            return Err(BufferError::SchemaMismatch {
                field: name.to_string(),
                reason: "variable-length attribute requires an offsets buffer".to_string(),
            });
        }
        self.fields
            .insert(name.to_string(), FieldBuffer::Fixed(data));
        Ok(())
    }

    /// Attach a variable-length attribute's (offsets, values) buffer pair.
    pub fn set_var(
        &mut self,
        schema: &ArraySchema,
        name: &str,
        offsets: &'a [u64],
        values: &'a [u8],
    ) -> Result<(), BufferError> {
        let attr = schema
            .attribute(name)
            .ok_or_else(|| BufferError::UnknownField(name.to_string()))?;
        if attr.cell_val_num != CellValNum::Var {
            return Err(BufferError::SchemaMismatch {
                field: name.to_string(),
                reason: "fixed-length attribute does not take an offsets buffer".to_string(),
            });
        }
        self.fields
            .insert(name.to_string(), FieldBuffer::Var { offsets, values });
        Ok(())
    }

    /// Look up the buffer attached for a field, if any
    pub(crate) fn get(&self, name: &str) -> Option<&FieldBuffer<'a>> {
        self.fields.get(name)
    }
}
