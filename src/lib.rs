//! # gridstore - Sparse Multi-Dimensional Array Storage
//!
//! `gridstore` is the write and ingestion core of a sparse array storage
//! engine. It turns caller-supplied columnar buffers into immutable,
//! atomically committed *fragments*: self-describing units of globally
//! ordered, tiled cell data that later reads merge by timestamp.
//!
//! ## Key Properties
//!
//! - **Sparse cells**: each cell is an N-dimensional `u64` coordinate
//!   tuple plus one value per schema attribute, fixed- or
//!   variable-length.
//!
//! - **Global cell order**: cells are stored sorted first by the space
//!   tile their coordinates fall in (under the tile order), then by the
//!   cell order within the tile. Tiles are capacity-sized chunks of this
//!   sorted stream.
//!
//! - **Fragments are atomic**: a fragment becomes visible only when its
//!   commit marker lands, after the data stream and metadata document
//!   are durably in place. A crashed or abandoned write leaves nothing
//!   observable behind.
//!
//! - **Layouts**: `Unordered` submissions are sorted by the engine and
//!   each commits its own fragment; `GlobalOrder` submissions must
//!   arrive pre-sorted and accumulate into a single fragment sealed at
//!   finalize.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gridstore::prelude::*;
//!
//! let schema = Arc::new(
//!     ArraySchema::builder("weather")
//!         .dimension(Dimension::with_extent("x", 1, 100, 10))
//!         .dimension(Dimension::with_extent("y", 1, 100, 10))
//!         .attribute("reading", Datatype::Int32)
//!         .capacity(1000)
//!         .build()?,
//! );
//!
//! let backend = Arc::new(DirectoryBackend::new("weather.gridstore")?);
//! let array = Array::new(Arc::clone(&schema), backend);
//!
//! let coords = [3u64, 4, 4, 2, 1, 1];
//! let readings: Vec<u8> = [7i32, 5, 0].iter().flat_map(|v| v.to_le_bytes()).collect();
//!
//! let mut query = array.open_write(Layout::Unordered);
//! query.set_coords(&coords)?;
//! query.set_buffer("reading", &readings)?;
//! query.submit()?;
//! let stats = query.finalize()?;
//! println!("wrote {}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## On-Disk Layout
//!
//! ```text
//! weather.gridstore/
//! ├── __1724680000000_a1b2…/
//! │   ├── fragment.bin     # tiled cell data, little-endian
//! │   ├── fragment.json    # metadata and tile index
//! │   └── .committed       # commit marker, written last
//! └── __1724680001000_c3d4…/
//!     └── …
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: array schemas, domains, datatypes and the global-order
//!   comparator
//! - [`buffer`]: borrowed buffer views and submission validation
//! - [`layout`]: write-order resolution per layout mode
//! - [`fragment`]: tile serialization, the tile index and the commit
//!   protocol
//! - [`storage`]: the storage backend trait plus directory and in-memory
//!   implementations
//! - [`query`]: the caller-facing write query state machine
//! - [`reader`]: fragment read-back for verification and tooling

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod fragment;
pub mod layout;
pub mod query;
pub mod reader;
pub mod schema;
pub mod storage;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::buffer::{BufferError, BufferSet, FieldBuffer};
    pub use crate::fragment::{FragmentError, FragmentMetadata, FragmentWriter};
    pub use crate::layout::{Layout, LayoutError};
    pub use crate::query::{Array, QueryError, WriteQuery, WriteStats};
    pub use crate::reader::{ArrayReader, FragmentCells, FragmentSnapshot, ReaderError};
    pub use crate::schema::{
        ArraySchema, ArraySchemaBuilder, Attribute, CellOrder, CellValNum, Datatype, Dimension,
        Domain, SchemaError,
    };
    pub use crate::storage::{DirectoryBackend, MemoryBackend, StorageBackend, StorageError};
}
