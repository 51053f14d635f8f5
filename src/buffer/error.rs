/// Errors raised while validating caller buffers into a cell batch
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// A declared field has no buffer set at submit time
    #[error("incomplete buffer set: no buffer for field '{0}'")]
    IncompleteBufferSet(String),

    /// A buffer was set for a field the schema does not declare
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Buffer shape or content is inconsistent with the declared field
    #[error("schema mismatch for field '{field}': {reason}")]
    SchemaMismatch {
        /// Offending field name
        field: String,
        /// What did not line up
        reason: String,
    },

    /// A field's cell count differs from the coordinate cell count
    #[error("cell count mismatch for field '{field}': {actual} cells, coordinates have {expected}")]
    CellCountMismatch {
        /// Offending field name
        field: String,
        /// Cell count implied by the coordinates buffer
        expected: usize,
        /// Cell count implied by this field's buffers
        actual: usize,
    },

    /// Variable-length offsets are non-monotonic or out of range
    #[error("corrupted offsets for field '{field}': {reason}")]
    CorruptedOffsets {
        /// Offending field name
        field: String,
        /// What was wrong with the offsets
        reason: String,
    },
}
