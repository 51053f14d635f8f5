//! # Layout Resolver
//!
//! Determines the order in which a submission's cells are stored.
//!
//! Under [`Layout::Unordered`] the resolver computes a stable sort
//! permutation under the schema's global-order comparator
//! ([`crate::schema::Domain::global_cmp`]); duplicate coordinates keep
//! their submission order and are *not* deduplicated at write time,
//! since resolving duplicates is the query-time merge policy's job.
//!
//! Under [`Layout::GlobalOrder`] the caller guarantees the cells already
//! follow the global order; the resolver only runs a cheap monotonicity
//! check and fails fast on the first violation, including against the
//! last cell of the previous submission in the same query.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::buffer::CellBatch;
use crate::schema::Domain;


/// Write layout mode selected per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Cells arrive already in the array's global cell order
    GlobalOrder,
    /// Cells arrive in arbitrary order; the engine sorts
    Unordered,
}

/// Errors raised while resolving the write order
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Global-order input broke the global cell order
    #[error("global-order write is not monotonic at cell {position}")]
    OrderViolation {
        /// Index of the first out-of-order cell within the submission
        position: usize,
    },
}

/// Compute the storage order for a batch under the given layout.
///
/// The returned permutation has one entry per cell and must be applied to
/// *every* column consistently. `prev_last` carries the last coordinate
/// tuple stored by an earlier submission of the same global-order query;
/// `Unordered` callers pass `None`.
pub fn resolve_write_order(
    domain: &Domain,
    batch: &CellBatch,
    layout: Layout,
    prev_last: Option<&[u64]>,
) -> Result<Vec<usize>, LayoutError> {
    match layout {
        Layout::GlobalOrder => {
            if batch.is_empty() {
                return Ok(Vec::new());
            }
            if let Some(prev) = prev_last {
                if domain.global_cmp(prev, batch.coords(0)) == Ordering::Greater {
                    return Err(LayoutError::OrderViolation { position: 0 });
                }
            }
            for i in 1..batch.cell_count() {
                if domain.global_cmp(batch.coords(i - 1), batch.coords(i)) == Ordering::Greater {
                    return Err(LayoutError::OrderViolation { position: i });
                }
            }
            Ok((0..batch.cell_count()).collect())
        }
        Layout::Unordered => {
            let mut order: Vec<usize> = (0..batch.cell_count()).collect();
            // sort_by is stable: duplicate coordinates keep submission order
            order.sort_by(|&a, &b| domain.global_cmp(batch.coords(a), batch.coords(b)));
            Ok(order)
        }
    }
}
