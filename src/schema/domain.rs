use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Axis ordering used for tile and cell comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellOrder {
    /// First dimension varies slowest
    RowMajor,
    /// Last dimension varies slowest
    ColMajor,
}

/// One dimension of the array domain.
///
/// Dimension coordinates are always `u64`. The inclusive `[lower, upper]`
/// domain bounds the coordinates an array accepts; the optional tile
/// extent aligns the global order to space tiles of that width. Without
/// an extent the dimension contributes a single tile spanning the whole
/// domain, so the global order degenerates to the plain cell order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Dimension name, unique within the schema
    pub name: String,
    /// Inclusive lower domain bound
    pub lower: u64,
    /// Inclusive upper domain bound
    pub upper: u64,
    /// Optional space-tile extent along this dimension
    pub tile_extent: Option<u64>,
}

impl Dimension {
    /// Create a dimension without a tile extent
    pub fn new(name: impl Into<String>, lower: u64, upper: u64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            tile_extent: None,
        }
    }

    /// Create a dimension with a tile extent
    pub fn with_extent(name: impl Into<String>, lower: u64, upper: u64, extent: u64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            tile_extent: Some(extent),
        }
    }

    /// Tile coordinate of `coord` along this dimension
    #[inline]
    fn tile_coord(&self, coord: u64) -> u64 {
        match self.tile_extent {
            Some(extent) => (coord.saturating_sub(self.lower)) / extent,
            None => 0,
        }
    }
}

/// The array domain: ordered dimensions plus tile and cell orders.
///
/// Owns the global-order comparator used for sorting unordered input and
/// for monotonicity checks on global-order input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Ordered dimension list
    pub dimensions: Vec<Dimension>,
    /// Order in which space tiles succeed one another
    pub tile_order: CellOrder,
    /// Order of cells within a space tile
    pub cell_order: CellOrder,
}

impl Domain {
    /// Number of dimensions
    #[inline]
    pub fn dim_num(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns true if `coords` lies inside the domain bounds
    pub fn contains(&self, coords: &[u64]) -> bool {
        debug_assert_eq!(coords.len(), self.dim_num());
        self.dimensions
            .iter()
            .zip(coords)
            .all(|(dim, &c)| c >= dim.lower && c <= dim.upper)
    }

    /// Compare two coordinate tuples under the array's global cell order.
    ///
    /// Tile coordinates are compared first under the tile order, then the
    /// cell coordinates under the cell order. Equal coordinates compare
    /// equal; the caller is responsible for a stable tie-break.
    pub fn global_cmp(&self, a: &[u64], b: &[u64]) -> Ordering {
        debug_assert_eq!(a.len(), self.dim_num());
        debug_assert_eq!(b.len(), self.dim_num());

        let tile_cmp = Self::axis_cmp(self.tile_order, a.len(), |i| {
            let dim = &self.dimensions[i];
            dim.tile_coord(a[i]).cmp(&dim.tile_coord(b[i]))
        });
        if tile_cmp != Ordering::Equal {
            return tile_cmp;
        }

        Self::axis_cmp(self.cell_order, a.len(), |i| a[i].cmp(&b[i]))
    }

    /// Lexicographic comparison over dimension axes in the given order
    fn axis_cmp<F>(order: CellOrder, dim_num: usize, mut cmp_axis: F) -> Ordering
    where
        F: FnMut(usize) -> Ordering,
    {
        match order {
            CellOrder::RowMajor => {
                for i in 0..dim_num {
                    let ord = cmp_axis(i);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
            CellOrder::ColMajor => {
                for i in (0..dim_num).rev() {
                    let ord = cmp_axis(i);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
        Ordering::Equal
    }
}
