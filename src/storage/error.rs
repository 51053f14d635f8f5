/// Errors surfaced by storage backends.
///
/// I/O failures are propagated to the caller, never retried internally;
/// retry policy belongs to the layer that owns the write.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error from the underlying storage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The named fragment does not exist (or is not committed)
    #[error("fragment '{0}' not found")]
    NotFound(String),

    /// A fragment with this name already exists
    #[error("fragment '{0}' already exists")]
    AlreadyExists(String),

    /// A read reached past the end of a fragment's data stream
    #[error("read past end of fragment '{fragment}': offset {offset} + {len} exceeds {size} bytes")]
    OutOfBounds {
        /// Fragment name
        fragment: String,
        /// Requested offset
        offset: u64,
        /// Requested length
        len: u64,
        /// Actual stream size
        size: u64,
    },
}
