use serde::{Deserialize, Serialize};

use super::datatype::Datatype;

/// Number of values a cell stores for an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellValNum {
    /// Every cell stores exactly this many values
    Fixed(u32),
    /// The value count varies per cell; the caller supplies an offsets
    /// buffer alongside the values buffer
    Var,
}

impl CellValNum {
    /// Single value per cell, the common fixed-length case
    pub const ONE: CellValNum = CellValNum::Fixed(1);

    /// Returns true for variable-length attributes
    #[inline]
    pub fn is_var(&self) -> bool {
        matches!(self, CellValNum::Var)
    }
}

/// One attribute declared by the array schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, unique within the schema
    pub name: String,
    /// Value datatype
    pub datatype: Datatype,
    /// Fixed or variable value count per cell
    pub cell_val_num: CellValNum,
}

impl Attribute {
    /// Create a fixed-length attribute storing one value per cell
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            cell_val_num: CellValNum::ONE,
        }
    }

    /// Create a fixed-length attribute storing `n` values per cell
    pub fn fixed(name: impl Into<String>, datatype: Datatype, n: u32) -> Self {
        Self {
            name: name.into(),
            datatype,
            cell_val_num: CellValNum::Fixed(n),
        }
    }

    /// Create a variable-length attribute
    pub fn var(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            cell_val_num: CellValNum::Var,
        }
    }

    /// Bytes per cell for fixed-length attributes, `None` for var-length
    #[inline]
    pub fn cell_size(&self) -> Option<usize> {
        match self.cell_val_num {
            CellValNum::Fixed(n) => Some(n as usize * self.datatype.size()),
            CellValNum::Var => None,
        }
    }
}
