//! # Write Query State Machine
//!
//! The caller-facing write path: open an [`Array`] against a storage
//! backend, start a [`WriteQuery`] under a [`crate::layout::Layout`],
//! attach buffers, submit one or more times, and finalize.
//!
//! The lifecycle is strict. Submissions validate the attached buffer set
//! in full before any byte is written; a failed submission leaves no
//! partial state. `finalize` seals any accumulated fragment and yields a
//! [`WriteStats`] summary; further submissions fail with
//! [`QueryError::FragmentSealed`] and a second finalize with
//! [`QueryError::AlreadyFinalized`]. Dropping an unfinalized query
//! discards uncommitted cells and logs the discard.

mod error;
mod write;

#[cfg(test)]
mod tests;

pub use error::QueryError;
pub use write::{Array, WriteQuery, WriteStats};
