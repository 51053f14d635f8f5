//! # Fragment Writer & Finalizer
//!
//! A fragment is the immutable unit of persisted write output. The
//! [`FragmentWriter`] accumulates permuted cell batches into tiles,
//! serializes each full tile to the fragment's append-only data stream,
//! and tracks the per-tile index (byte ranges per column, cell count,
//! coordinate bounding box) along the way.
//!
//! Sealing a fragment ([`FragmentWriter::seal`]) flushes the trailing
//! partial tile, syncs the data stream, writes the metadata document and
//! finally the commit marker, in that order. A fragment is therefore
//! never visible in a partially written state. `seal` consumes the
//! writer: appending to a sealed fragment is impossible by construction,
//! and the write state machine surfaces the corresponding sealed-fragment
//! error for out-of-sequence calls.
//!
//! ## Tile encoding
//!
//! Each tile is one contiguous byte run: the interleaved coordinates
//! block (`u64` little-endian per dimension per cell), then one block per
//! attribute in schema order. Fixed-length blocks carry raw value bytes;
//! variable-length blocks carry `cell_count` little-endian `u64`
//! tile-local value offsets followed by the value bytes.

mod error;
mod metadata;
mod writer;


pub use error::FragmentError;
pub use metadata::{AttributeDescriptor, ColumnSlice, FragmentMetadata, TileIndexEntry};
pub use writer::FragmentWriter;

use crate::schema::FRAGMENT_NAME_PREFIX;

/// Mint a unique fragment name.
///
/// Names embed a millisecond timestamp so a lexicographic sort lists
/// fragments in creation order, plus a v4 UUID for uniqueness across
/// concurrent writers.
pub fn new_fragment_name() -> String {
    format!(
        "{}{}_{}",
        FRAGMENT_NAME_PREFIX,
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}
