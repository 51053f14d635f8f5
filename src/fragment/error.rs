use crate::storage::StorageError;

/// Errors raised while writing or sealing a fragment
#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    /// Storage backend failure; the fragment stays uncommitted and
    /// invisible, cleanup of the orphan is external
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Fragment metadata could not be serialized
    #[error("metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),
}
