use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};

use crate::buffer::AttributeColumn;
use crate::schema::{ArraySchema, CellValNum, Datatype};

use super::error::ReaderError;

/// The fully materialized cells of one fragment, in global order.
///
/// Columns are decoded per fragment: variable-length offsets are rebased
/// from tile-local to fragment-wide, so every accessor addresses cells by
/// their global-order position within the fragment.
#[derive(Debug, Clone)]
pub struct FragmentCells {
    schema: Arc<ArraySchema>,
    cell_count: usize,
    coords: Vec<u64>,
    columns: Vec<AttributeColumn>,
}

impl FragmentCells {
    pub(crate) fn new(
        schema: Arc<ArraySchema>,
        cell_count: usize,
        coords: Vec<u64>,
        columns: Vec<AttributeColumn>,
    ) -> Self {
        Self {
            schema,
            cell_count,
            coords,
            columns,
        }
    }

    /// Number of cells in the fragment
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Coordinate tuple of cell `i`
    #[inline]
    pub fn coords(&self, i: usize) -> &[u64] {
        let dim_num = self.schema.dim_num();
        &self.coords[i * dim_num..(i + 1) * dim_num]
    }

    /// The interleaved coordinates of every cell
    #[inline]
    pub fn coords_flat(&self) -> &[u64] {
        &self.coords
    }

    fn column(&self, name: &str) -> Result<usize, ReaderError> {
        self.schema
            .attributes
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| ReaderError::UnknownAttribute(name.to_string()))
    }

    fn checked_column(&self, name: &str, requested: Datatype) -> Result<usize, ReaderError> {
        let idx = self.column(name)?;
        let attr = &self.schema.attributes[idx];
        if attr.datatype != requested {
            return Err(ReaderError::TypeMismatch {
                field: attr.name.clone(),
                actual: attr.datatype,
                requested,
            });
        }
        Ok(idx)
    }

    fn fixed_data(&self, idx: usize) -> Result<&[u8], ReaderError> {
        match &self.columns[idx] {
            AttributeColumn::Fixed { data, .. } => Ok(data),
            AttributeColumn::Var { .. } => Err(ReaderError::VarLengthAttribute {
                field: self.schema.attributes[idx].name.clone(),
            }),
        }
    }

    /// Raw value bytes of cell `i` of the named attribute
    pub fn cell_bytes(&self, name: &str, i: usize) -> Result<&[u8], ReaderError> {
        let idx = self.column(name)?;
        Ok(self.columns[idx].cell_bytes(i))
    }

    /// All values of a fixed-length `int32` attribute, in cell order
    pub fn i32_values(&self, name: &str) -> Result<Vec<i32>, ReaderError> {
        let idx = self.checked_column(name, Datatype::Int32)?;
        let data = self.fixed_data(idx)?;
        Ok(data.chunks_exact(4).map(LittleEndian::read_i32).collect())
    }

    /// All values of a fixed-length `int64` attribute, in cell order
    pub fn i64_values(&self, name: &str) -> Result<Vec<i64>, ReaderError> {
        let idx = self.checked_column(name, Datatype::Int64)?;
        let data = self.fixed_data(idx)?;
        Ok(data.chunks_exact(8).map(LittleEndian::read_i64).collect())
    }

    /// All values of a fixed-length `uint64` attribute, in cell order
    pub fn u64_values(&self, name: &str) -> Result<Vec<u64>, ReaderError> {
        let idx = self.checked_column(name, Datatype::UInt64)?;
        let data = self.fixed_data(idx)?;
        Ok(data.chunks_exact(8).map(LittleEndian::read_u64).collect())
    }

    /// All values of a fixed-length `float32` attribute, in cell order
    pub fn f32_values(&self, name: &str) -> Result<Vec<f32>, ReaderError> {
        let idx = self.checked_column(name, Datatype::Float32)?;
        let data = self.fixed_data(idx)?;
        Ok(data.chunks_exact(4).map(LittleEndian::read_f32).collect())
    }

    /// All values of a fixed-length `float64` attribute, in cell order
    pub fn f64_values(&self, name: &str) -> Result<Vec<f64>, ReaderError> {
        let idx = self.checked_column(name, Datatype::Float64)?;
        let data = self.fixed_data(idx)?;
        Ok(data.chunks_exact(8).map(LittleEndian::read_f64).collect())
    }

    /// Per-cell strings of a variable-length `char` attribute
    pub fn var_strings(&self, name: &str) -> Result<Vec<String>, ReaderError> {
        let idx = self.checked_column(name, Datatype::Char)?;
        let attr = &self.schema.attributes[idx];
        if attr.cell_val_num != CellValNum::Var {
            return Err(ReaderError::VarLengthAttribute {
                field: attr.name.clone(),
            });
        }
        let column = &self.columns[idx];
        Ok((0..self.cell_count)
            .map(|i| String::from_utf8_lossy(column.cell_bytes(i)).into_owned())
            .collect())
    }
}
