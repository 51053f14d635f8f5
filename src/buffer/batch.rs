/// One validated attribute column of a cell batch, in schema order.
#[derive(Debug, Clone)]
pub enum AttributeColumn {
    /// Fixed-length column: `cell_size` bytes per cell
    Fixed {
        /// Bytes per cell
        cell_size: usize,
        /// `cell_count * cell_size` value bytes
        data: Vec<u8>,
    },
    /// Variable-length column
    Var {
        /// Per-cell starting byte offsets, one per cell, non-decreasing
        offsets: Vec<u64>,
        /// Flat values buffer
        values: Vec<u8>,
    },
}

impl AttributeColumn {
    /// The value bytes of cell `i`.
    ///
    /// For variable-length columns the run ends at the next cell's offset,
    /// or at the end of the values buffer for the last cell.
    pub fn cell_bytes(&self, i: usize) -> &[u8] {
        match self {
            AttributeColumn::Fixed { cell_size, data } => {
                &data[i * cell_size..(i + 1) * cell_size]
            }
            AttributeColumn::Var { offsets, values } => {
                let start = offsets[i] as usize;
                let end = offsets
                    .get(i + 1)
                    .map(|&o| o as usize)
                    .unwrap_or(values.len());
                &values[start..end]
            }
        }
    }
}

/// Validated columnar representation of one submission's cells.
///
/// All columns cover the same cells; the coordinate column is interleaved
/// (`dim_num` values per cell) and attribute columns follow schema order.
/// Batches own their data: the caller's buffers are released the moment a
/// batch is built.
#[derive(Debug, Clone)]
pub struct CellBatch {
    cell_count: usize,
    dim_num: usize,
    coords: Vec<u64>,
    columns: Vec<AttributeColumn>,
}

impl CellBatch {
    pub(crate) fn new(
        cell_count: usize,
        dim_num: usize,
        coords: Vec<u64>,
        columns: Vec<AttributeColumn>,
    ) -> Self {
        debug_assert_eq!(coords.len(), cell_count * dim_num);
        Self {
            cell_count,
            dim_num,
            coords,
            columns,
        }
    }

    /// Number of cells in the batch
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Returns true if the batch holds no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_count == 0
    }

    /// Coordinate tuple of cell `i`
    #[inline]
    pub fn coords(&self, i: usize) -> &[u64] {
        &self.coords[i * self.dim_num..(i + 1) * self.dim_num]
    }

    /// Attribute columns in schema order
    #[inline]
    pub fn columns(&self) -> &[AttributeColumn] {
        &self.columns
    }
}
