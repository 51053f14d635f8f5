//! # Storage Backend
//!
//! The write core's only contact with durable storage: an append-only
//! byte sink per fragment, an atomic small-file write for fragment
//! metadata, and an atomic commit-marker write that makes a fragment
//! visible. The read half (list / read) serves the committed-fragment
//! read surface.
//!
//! A fragment is visible if and only if its commit marker exists; data
//! and metadata written without a marker are orphans awaiting external
//! cleanup and are never listed.
//!
//! Two implementations ship with the crate: [`DirectoryBackend`] for a
//! filesystem array directory, and [`MemoryBackend`] for tests and
//! tooling.

mod directory;
mod error;
mod memory;

#[cfg(test)]
mod tests;

use std::io::Write;

pub use directory::DirectoryBackend;
pub use error::StorageError;
pub use memory::MemoryBackend;

/// Append-only byte sink for one fragment's tile data stream.
///
/// Writes append at the current end of the stream; `sync` must not return
/// until every byte written so far is durable.
pub trait FragmentSink: Write + Send {
    /// Force all written bytes to durable storage
    fn sync(&mut self) -> Result<(), StorageError>;
}

/// Durable storage for one array's fragments.
pub trait StorageBackend: Send + Sync {
    /// Create a fragment and return the append-only sink for its data
    /// stream. Fails if the fragment already exists.
    fn create(&self, fragment: &str) -> Result<Box<dyn FragmentSink>, StorageError>;

    /// Atomically write the fragment's metadata document
    fn put_metadata(&self, fragment: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Atomically write the commit marker, making the fragment visible.
    ///
    /// Must only be called once data and metadata are durable.
    fn commit(&self, fragment: &str) -> Result<(), StorageError>;

    /// Names of committed fragments, sorted ascending
    fn list_committed(&self) -> Result<Vec<String>, StorageError>;

    /// Read a committed fragment's metadata document
    fn read_metadata(&self, fragment: &str) -> Result<Vec<u8>, StorageError>;

    /// Random-access read of `len` bytes at `offset` in a fragment's data
    /// stream
    fn read_at(&self, fragment: &str, offset: u64, len: u64) -> Result<Vec<u8>, StorageError>;
}
