use crate::buffer::BufferError;
use crate::fragment::FragmentError;
use crate::layout::LayoutError;
use crate::storage::StorageError;

/// Errors surfaced by the write query state machine
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The attached buffer set is invalid or incomplete
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// A global-order submission violated the global cell order
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Fragment serialization or commit failed
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// `finalize` was called more than once
    #[error("write query already finalized")]
    AlreadyFinalized,

    /// A submission arrived after the query's fragment was sealed
    #[error("fragment is sealed; the query accepts no further submissions")]
    FragmentSealed,

    /// An earlier submission failed mid-write and its fragment was
    /// abandoned; the query accepts no further calls
    #[error("write query aborted: a failed submission discarded its fragment")]
    Aborted,
}
