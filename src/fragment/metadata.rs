use serde::{Deserialize, Serialize};

use crate::schema::{ArraySchema, Attribute, CellValNum, Datatype, GRIDSTORE_FORMAT_VERSION};

/// Byte range of one column block within the fragment data stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSlice {
    /// Offset of the block from the start of the data stream
    pub offset: u64,
    /// Length of the block in bytes
    pub len: u64,
}

/// Index entry for one serialized tile.
///
/// `columns[0]` is always the coordinates block; the remaining entries
/// follow the schema's attribute order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileIndexEntry {
    /// Number of cells in the tile
    pub cell_count: u64,
    /// Per-dimension inclusive `[lo, hi]` bounds over the tile's cells
    pub bbox: Vec<[u64; 2]>,
    /// Byte range per column block
    pub columns: Vec<ColumnSlice>,
}

/// Shape and size summary for one attribute across the whole fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name
    pub name: String,
    /// Value datatype
    pub datatype: Datatype,
    /// Values per cell
    pub cell_val_num: CellValNum,
    /// Total serialized bytes across all tiles, offsets included for
    /// variable-length attributes
    pub total_bytes: u64,
}

impl AttributeDescriptor {
    pub(crate) fn new(attribute: &Attribute, total_bytes: u64) -> Self {
        Self {
            name: attribute.name.clone(),
            datatype: attribute.datatype,
            cell_val_num: attribute.cell_val_num,
            total_bytes,
        }
    }
}

/// The metadata document persisted next to a fragment's data stream.
///
/// Serialized as JSON and written atomically before the commit marker, so
/// readers never observe a committed fragment without complete metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentMetadata {
    /// On-disk format version
    pub format_version: String,
    /// Name of the array the fragment belongs to
    pub array: String,
    /// Fragment name
    pub fragment: String,
    /// Creation timestamp, RFC 3339
    pub created: String,
    /// Total number of cells in the fragment
    pub cell_count: u64,
    /// Per-dimension inclusive bounds over every cell in the fragment;
    /// `None` for an empty fragment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<[u64; 2]>>,
    /// One descriptor per attribute, in schema order
    pub attributes: Vec<AttributeDescriptor>,
    /// Tile index in global-order position
    pub tiles: Vec<TileIndexEntry>,
}

impl FragmentMetadata {
    pub(crate) fn new(schema: &ArraySchema, fragment: String) -> Self {
        Self {
            format_version: GRIDSTORE_FORMAT_VERSION.to_string(),
            array: schema.name.clone(),
            fragment,
            created: chrono::Utc::now().to_rfc3339(),
            cell_count: 0,
            domain: None,
            attributes: Vec::new(),
            tiles: Vec::new(),
        }
    }

    /// Number of tiles in the fragment
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Parse a metadata document read back from storage
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize the document for storage
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}
