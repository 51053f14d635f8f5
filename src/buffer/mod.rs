//! # Cell Buffer Adapter
//!
//! Validates and interprets caller-supplied per-field buffers into an
//! owned, columnar [`CellBatch`].
//!
//! Callers set one buffer per fixed-length attribute, an (offsets, values)
//! pair per variable-length attribute, and one interleaved coordinate
//! buffer for the [`crate::schema::COORDS_FIELD`] pseudo-field. Buffers
//! are borrowed read-only views; the caller must not mutate them until the
//! submission call returns. Nothing in this module touches durable
//! storage: every validation error is raised before any byte is written.
//!
//! Variable-length offsets are byte offsets into the values buffer,
//! non-decreasing, one per cell; cell `i` spans `offsets[i]` up to
//! `offsets[i + 1]` (the last cell runs to the end of the values buffer).

mod adapter;
mod batch;
mod error;
mod views;

#[cfg(test)]
mod tests;

pub use adapter::build_batch;
pub use batch::{AttributeColumn, CellBatch};
pub use error::BufferError;
pub use views::{BufferSet, FieldBuffer};
