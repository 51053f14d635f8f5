use serde::{Deserialize, Serialize};

use super::attribute::{Attribute, CellValNum};
use super::constants::COORDS_FIELD;
use super::datatype::Datatype;
use super::domain::{CellOrder, Dimension, Domain};

/// Errors detected while validating an array schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema declares no dimensions
    #[error("schema '{0}' declares no dimensions")]
    NoDimensions(String),

    /// The schema declares no attributes
    #[error("schema '{0}' declares no attributes")]
    NoAttributes(String),

    /// A dimension or attribute name occurs more than once
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    /// A field uses the reserved coordinate pseudo-field name
    #[error("field name '{0}' is reserved")]
    ReservedName(String),

    /// A dimension's lower bound exceeds its upper bound
    #[error("dimension '{name}' has empty domain [{lower}, {upper}]")]
    EmptyDomain {
        /// Dimension name
        name: String,
        /// Offending lower bound
        lower: u64,
        /// Offending upper bound
        upper: u64,
    },

    /// A dimension's tile extent is zero or exceeds the domain range
    #[error("dimension '{name}' has invalid tile extent {extent}")]
    InvalidTileExtent {
        /// Dimension name
        name: String,
        /// Offending extent
        extent: u64,
    },

    /// A fixed-length attribute declares zero values per cell
    #[error("attribute '{0}' declares zero values per cell")]
    ZeroCellValNum(String),

    /// The tile capacity is zero
    #[error("tile capacity must be positive")]
    ZeroCapacity,
}

/// Validated array schema: domain, attributes, and tile capacity.
///
/// Schemas are immutable once built; the write core treats them as
/// read-only input from the external schema service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Array name
    pub name: String,
    /// Domain: dimensions plus tile/cell orders
    pub domain: Domain,
    /// Ordered attribute list
    pub attributes: Vec<Attribute>,
    /// Maximum number of cells per data tile
    pub capacity: u64,
}

impl ArraySchema {
    /// Start building a schema for the named array
    pub fn builder(name: impl Into<String>) -> ArraySchemaBuilder {
        ArraySchemaBuilder::new(name)
    }

    /// Number of dimensions
    #[inline]
    pub fn dim_num(&self) -> usize {
        self.domain.dim_num()
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Bytes per cell in the interleaved coordinates column
    #[inline]
    pub fn coords_cell_size(&self) -> usize {
        self.dim_num() * std::mem::size_of::<u64>()
    }
}

/// Builder for [`ArraySchema`]; `build` validates the assembled schema.
#[derive(Debug, Clone)]
pub struct ArraySchemaBuilder {
    name: String,
    dimensions: Vec<Dimension>,
    attributes: Vec<Attribute>,
    capacity: u64,
    tile_order: CellOrder,
    cell_order: CellOrder,
}

impl ArraySchemaBuilder {
    /// Create a builder with row-major orders and a capacity of 10_000
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: Vec::new(),
            attributes: Vec::new(),
            capacity: 10_000,
            tile_order: CellOrder::RowMajor,
            cell_order: CellOrder::RowMajor,
        }
    }

    /// Append a dimension
    pub fn dimension(mut self, dim: Dimension) -> Self {
        self.dimensions.push(dim);
        self
    }

    /// Append a fixed-length single-value attribute
    pub fn attribute(mut self, name: impl Into<String>, datatype: Datatype) -> Self {
        self.attributes.push(Attribute::new(name, datatype));
        self
    }

    /// Append a fixed-length attribute with `n` values per cell
    pub fn attribute_fixed(mut self, name: impl Into<String>, datatype: Datatype, n: u32) -> Self {
        self.attributes.push(Attribute::fixed(name, datatype, n));
        self
    }

    /// Append a variable-length attribute
    pub fn attribute_var(mut self, name: impl Into<String>, datatype: Datatype) -> Self {
        self.attributes.push(Attribute::var(name, datatype));
        self
    }

    /// Set the tile capacity (cells per data tile)
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the tile order
    pub fn tile_order(mut self, order: CellOrder) -> Self {
        self.tile_order = order;
        self
    }

    /// Set the cell order
    pub fn cell_order(mut self, order: CellOrder) -> Self {
        self.cell_order = order;
        self
    }

    /// Validate and produce the schema
    pub fn build(self) -> Result<ArraySchema, SchemaError> {
        if self.dimensions.is_empty() {
            return Err(SchemaError::NoDimensions(self.name));
        }
        if self.attributes.is_empty() {
            return Err(SchemaError::NoAttributes(self.name));
        }
        if self.capacity == 0 {
            return Err(SchemaError::ZeroCapacity);
        }

        let mut seen = std::collections::HashSet::new();
        for name in self
            .dimensions
            .iter()
            .map(|d| d.name.as_str())
            .chain(self.attributes.iter().map(|a| a.name.as_str()))
        {
            if name == COORDS_FIELD {
                return Err(SchemaError::ReservedName(name.to_string()));
            }
            if !seen.insert(name.to_string()) {
                return Err(SchemaError::DuplicateField(name.to_string()));
            }
        }

        for dim in &self.dimensions {
            if dim.lower > dim.upper {
                return Err(SchemaError::EmptyDomain {
                    name: dim.name.clone(),
                    lower: dim.lower,
                    upper: dim.upper,
                });
            }
            if let Some(extent) = dim.tile_extent {
                if extent == 0 || extent > dim.upper - dim.lower + 1 {
                    return Err(SchemaError::InvalidTileExtent {
                        name: dim.name.clone(),
                        extent,
                    });
                }
            }
        }

        for attr in &self.attributes {
            if attr.cell_val_num == CellValNum::Fixed(0) {
                return Err(SchemaError::ZeroCellValNum(attr.name.clone()));
            }
        }

        Ok(ArraySchema {
            name: self.name,
            domain: Domain {
                dimensions: self.dimensions,
                tile_order: self.tile_order,
                cell_order: self.cell_order,
            },
            attributes: self.attributes,
            capacity: self.capacity,
        })
    }
}
