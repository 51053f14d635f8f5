//! # Array Schema Model
//!
//! This module defines the read-only schema the write core consumes:
//! dimensions, attributes, value datatypes, the tile capacity, and the
//! global cell order the array is stored in.
//!
//! ## Global cell order
//!
//! The schema defines a deterministic total order over coordinates. Cells
//! are first compared by the tile they fall into (tile coordinates derived
//! from per-dimension tile extents, compared under the schema's *tile*
//! order), then by their coordinates within the tile (compared under the
//! schema's *cell* order). Both orders are row-major or column-major.
//!
//! The write core only *applies* this order; it never defines it. Sorting
//! and monotonicity checks elsewhere in the crate go through
//! [`Domain::global_cmp`] so that tile-aligned orders are handled
//! correctly instead of comparing raw coordinate tuples.

mod array;
mod attribute;
mod constants;
mod datatype;
mod domain;


pub use array::{ArraySchema, ArraySchemaBuilder, SchemaError};
pub use attribute::{Attribute, CellValNum};
pub use constants::*;
pub use datatype::Datatype;
pub use domain::{CellOrder, Dimension, Domain};
