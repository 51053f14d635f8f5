//! # Fragment Reader
//!
//! Read-back support for committed fragments: list what a write left
//! behind, decode tiles into columnar cell sets, and answer the array's
//! non-empty domain. The full query-time machinery (subarray selection,
//! cross-fragment merge, duplicate resolution) lives outside the write
//! core; this reader materializes one fragment at a time, which is what
//! verification and compaction tooling need.

mod cells;
mod error;


pub use cells::FragmentCells;
pub use error::ReaderError;

use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};

use crate::buffer::AttributeColumn;
use crate::fragment::FragmentMetadata;
use crate::schema::{ArraySchema, CellValNum};
use crate::storage::StorageBackend;

/// A committed fragment's metadata, as listed by [`ArrayReader::fragments`]
#[derive(Debug, Clone)]
pub struct FragmentSnapshot {
    metadata: FragmentMetadata,
}

impl FragmentSnapshot {
    /// Fragment name
    pub fn name(&self) -> &str {
        &self.metadata.fragment
    }

    /// Number of cells in the fragment
    pub fn cell_count(&self) -> u64 {
        self.metadata.cell_count
    }

    /// The full metadata document
    pub fn metadata(&self) -> &FragmentMetadata {
        &self.metadata
    }
}

/// Reads committed fragments of one array
pub struct ArrayReader {
    schema: Arc<ArraySchema>,
    backend: Arc<dyn StorageBackend>,
}

impl ArrayReader {
    /// Open a reader over the given backend
    pub fn new(schema: Arc<ArraySchema>, backend: Arc<dyn StorageBackend>) -> Self {
        Self { schema, backend }
    }

    /// List every committed fragment, in name order
    pub fn fragments(&self) -> Result<Vec<FragmentSnapshot>, ReaderError> {
        let mut snapshots = Vec::new();
        for name in self.backend.list_committed()? {
            let bytes = self.backend.read_metadata(&name)?;
            let metadata = FragmentMetadata::from_bytes(&bytes)?;
            snapshots.push(FragmentSnapshot { metadata });
        }
        Ok(snapshots)
    }

    /// Union of the per-fragment bounding boxes; `None` if nothing has
    /// been written yet
    pub fn nonempty_domain(&self) -> Result<Option<Vec<[u64; 2]>>, ReaderError> {
        let mut union: Option<Vec<[u64; 2]>> = None;
        for snapshot in self.fragments()? {
            let Some(bbox) = &snapshot.metadata.domain else {
                continue;
            };
            match &mut union {
                None => union = Some(bbox.clone()),
                Some(acc) => {
                    for (bounds, frag) in acc.iter_mut().zip(bbox) {
                        bounds[0] = bounds[0].min(frag[0]);
                        bounds[1] = bounds[1].max(frag[1]);
                    }
                }
            }
        }
        Ok(union)
    }

    /// Decode every tile of a fragment into one columnar cell set
    pub fn read_cells(&self, snapshot: &FragmentSnapshot) -> Result<FragmentCells, ReaderError> {
        let metadata = &snapshot.metadata;
        let fragment = metadata.fragment.as_str();
        let dim_num = self.schema.dim_num();
        let attr_num = self.schema.attributes.len();

        let mut coords = Vec::with_capacity(metadata.cell_count as usize * dim_num);
        let mut columns: Vec<AttributeColumn> = self
            .schema
            .attributes
            .iter()
            .map(|a| match a.cell_val_num {
                CellValNum::Var => AttributeColumn::Var {
                    offsets: Vec::new(),
                    values: Vec::new(),
                },
                CellValNum::Fixed(_) => AttributeColumn::Fixed {
                    // cell_size is Some for every fixed-length attribute
                    cell_size: a.cell_size().unwrap_or(0),
                    data: Vec::new(),
                },
            })
            .collect();

        for tile in &metadata.tiles {
            if tile.columns.len() != 1 + attr_num {
                return Err(ReaderError::Corrupt {
                    fragment: fragment.to_string(),
                    reason: format!(
                        "tile indexes {} columns, schema has {}",
                        tile.columns.len(),
                        1 + attr_num
                    ),
                });
            }
            let cells = tile.cell_count as usize;

            let block = self.read_slice(fragment, &tile.columns[0])?;
            if block.len() != cells * dim_num * 8 {
                return Err(ReaderError::Corrupt {
                    fragment: fragment.to_string(),
                    reason: "coordinate block length mismatch".to_string(),
                });
            }
            coords.extend(block.chunks_exact(8).map(LittleEndian::read_u64));

            for (column, slice) in columns.iter_mut().zip(&tile.columns[1..]) {
                let block = self.read_slice(fragment, slice)?;
                match column {
                    AttributeColumn::Fixed { cell_size, data } => {
                        if block.len() != cells * *cell_size {
                            return Err(ReaderError::Corrupt {
                                fragment: fragment.to_string(),
                                reason: "fixed column block length mismatch".to_string(),
                            });
                        }
                        data.extend_from_slice(&block);
                    }
                    AttributeColumn::Var { offsets, values } => {
                        let header = cells * 8;
                        if block.len() < header {
                            return Err(ReaderError::Corrupt {
                                fragment: fragment.to_string(),
                                reason: "variable column block shorter than its offsets"
                                    .to_string(),
                            });
                        }
                        // Rebase tile-local offsets onto the values
                        // accumulated from earlier tiles, rejecting
                        // offsets that regress or point past the tile's
                        // value bytes
                        let base = values.len() as u64;
                        let value_len = (block.len() - header) as u64;
                        let mut prev = 0u64;
                        for chunk in block[..header].chunks_exact(8) {
                            let local = LittleEndian::read_u64(chunk);
                            if local < prev || local > value_len {
                                return Err(ReaderError::Corrupt {
                                    fragment: fragment.to_string(),
                                    reason: "variable column offsets out of range".to_string(),
                                });
                            }
                            prev = local;
                            offsets.push(base + local);
                        }
                        values.extend_from_slice(&block[header..]);
                    }
                }
            }
        }

        log::debug!(
            "decoded fragment '{}': {} cells over {} tiles",
            fragment,
            metadata.cell_count,
            metadata.tile_count()
        );
        Ok(FragmentCells::new(
            Arc::clone(&self.schema),
            metadata.cell_count as usize,
            coords,
            columns,
        ))
    }

    fn read_slice(
        &self,
        fragment: &str,
        slice: &crate::fragment::ColumnSlice,
    ) -> Result<Vec<u8>, ReaderError> {
        Ok(self.backend.read_at(fragment, slice.offset, slice.len)?)
    }
}
