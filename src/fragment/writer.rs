use std::io::Write;
use std::sync::Arc;

use crate::buffer::CellBatch;
use crate::schema::ArraySchema;
use crate::storage::{FragmentSink, StorageBackend, StorageError};

use super::error::FragmentError;
use super::metadata::{AttributeDescriptor, ColumnSlice, FragmentMetadata, TileIndexEntry};

/// In-memory accumulator for one attribute of the pending tile
enum PendingColumn {
    Fixed { data: Vec<u8> },
    Var { lens: Vec<u64>, values: Vec<u8> },
}

impl PendingColumn {
    fn clear(&mut self) {
        match self {
            PendingColumn::Fixed { data } => data.clear(),
            PendingColumn::Var { lens, values } => {
                lens.clear();
                values.clear();
            }
        }
    }
}

/// Streams globally ordered cells into one fragment.
///
/// The writer buffers at most one tile's worth of cells in memory. Every
/// time the pending tile reaches the schema's capacity it is serialized
/// to the backend's data stream and recorded in the tile index. Appends
/// must already be in global order; ordering is the caller's concern (see
/// [`crate::layout::resolve_write_order`]).
///
/// [`seal`](Self::seal) consumes the writer and commits the fragment.
/// A writer that is dropped without sealing leaves only an uncommitted,
/// invisible fragment behind.
pub struct FragmentWriter {
    schema: Arc<ArraySchema>,
    name: String,
    sink: Box<dyn FragmentSink>,
    offset: u64,
    pending_coords: Vec<u64>,
    pending_columns: Vec<PendingColumn>,
    tiles: Vec<TileIndexEntry>,
    attr_bytes: Vec<u64>,
    cell_count: u64,
    domain: Option<Vec<[u64; 2]>>,
}

impl FragmentWriter {
    /// Create the fragment on the backend and return a writer for it
    pub fn create(
        schema: Arc<ArraySchema>,
        backend: &dyn StorageBackend,
        name: String,
    ) -> Result<Self, FragmentError> {
        let sink = backend.create(&name)?;
        let pending_columns = schema
            .attributes
            .iter()
            .map(|a| {
                if a.cell_val_num.is_var() {
                    PendingColumn::Var {
                        lens: Vec::new(),
                        values: Vec::new(),
                    }
                } else {
                    PendingColumn::Fixed { data: Vec::new() }
                }
            })
            .collect();
        let attr_bytes = vec![0u64; schema.attributes.len()];
        log::debug!("created fragment '{}' for array '{}'", name, schema.name);
        Ok(Self {
            schema,
            name,
            sink,
            offset: 0,
            pending_coords: Vec::new(),
            pending_columns,
            tiles: Vec::new(),
            attr_bytes,
            cell_count: 0,
            domain: None,
        })
    }

    /// Fragment name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cells appended so far, pending tile included
    pub fn cell_count(&self) -> u64 {
        self.cell_count
    }

    /// Append the cells of `batch` in the order given by the permutation
    /// `order`, flushing full tiles as the capacity boundary is crossed.
    pub fn append(&mut self, batch: &CellBatch, order: &[usize]) -> Result<(), FragmentError> {
        let dim_num = self.schema.dim_num();
        let capacity = self.schema.capacity as usize;
        for &cell in order {
            self.pending_coords.extend_from_slice(batch.coords(cell));
            for (pending, column) in self.pending_columns.iter_mut().zip(batch.columns()) {
                let bytes = column.cell_bytes(cell);
                match pending {
                    PendingColumn::Fixed { data } => data.extend_from_slice(bytes),
                    PendingColumn::Var { lens, values } => {
                        lens.push(bytes.len() as u64);
                        values.extend_from_slice(bytes);
                    }
                }
            }
            self.cell_count += 1;
            if self.pending_coords.len() / dim_num == capacity {
                self.flush_tile()?;
            }
        }
        Ok(())
    }

    /// Serialize the pending tile, if any, and record its index entry
    fn flush_tile(&mut self) -> Result<(), FragmentError> {
        let dim_num = self.schema.dim_num();
        let cells = self.pending_coords.len() / dim_num;
        if cells == 0 {
            return Ok(());
        }

        let mut buf = Vec::new();
        let mut columns = Vec::with_capacity(1 + self.pending_columns.len());

        for &c in &self.pending_coords {
            buf.extend_from_slice(&c.to_le_bytes());
        }
        columns.push(ColumnSlice {
            offset: self.offset,
            len: buf.len() as u64,
        });

        for (i, pending) in self.pending_columns.iter().enumerate() {
            let start = buf.len();
            match pending {
                PendingColumn::Fixed { data } => buf.extend_from_slice(data),
                PendingColumn::Var { lens, values } => {
                    let mut off = 0u64;
                    for &len in lens {
                        buf.extend_from_slice(&off.to_le_bytes());
                        off += len;
                    }
                    buf.extend_from_slice(values);
                }
            }
            let len = (buf.len() - start) as u64;
            self.attr_bytes[i] += len;
            columns.push(ColumnSlice {
                offset: self.offset + start as u64,
                len,
            });
        }

        self.sink.write_all(&buf).map_err(StorageError::from)?;

        let bbox = self.tile_bbox(dim_num);
        self.merge_domain(&bbox);
        self.tiles.push(TileIndexEntry {
            cell_count: cells as u64,
            bbox,
            columns,
        });
        self.offset += buf.len() as u64;

        self.pending_coords.clear();
        for pending in &mut self.pending_columns {
            pending.clear();
        }
        Ok(())
    }

    fn tile_bbox(&self, dim_num: usize) -> Vec<[u64; 2]> {
        let mut bbox = vec![[u64::MAX, 0u64]; dim_num];
        for cell in self.pending_coords.chunks_exact(dim_num) {
            for (bounds, &c) in bbox.iter_mut().zip(cell) {
                bounds[0] = bounds[0].min(c);
                bounds[1] = bounds[1].max(c);
            }
        }
        bbox
    }

    fn merge_domain(&mut self, bbox: &[[u64; 2]]) {
        match &mut self.domain {
            None => self.domain = Some(bbox.to_vec()),
            Some(domain) => {
                for (bounds, tile) in domain.iter_mut().zip(bbox) {
                    bounds[0] = bounds[0].min(tile[0]);
                    bounds[1] = bounds[1].max(tile[1]);
                }
            }
        }
    }

    /// Flush the trailing tile, sync the data stream, persist the
    /// metadata document and write the commit marker.
    ///
    /// Only after the marker lands is the fragment visible to readers; a
    /// failure at any earlier step leaves no observable trace.
    pub fn seal(mut self, backend: &dyn StorageBackend) -> Result<FragmentMetadata, FragmentError> {
        self.flush_tile()?;
        self.sink.sync()?;

        let mut metadata = FragmentMetadata::new(&self.schema, self.name.clone());
        metadata.cell_count = self.cell_count;
        metadata.domain = self.domain.take();
        metadata.attributes = self
            .schema
            .attributes
            .iter()
            .zip(&self.attr_bytes)
            .map(|(attr, &bytes)| AttributeDescriptor::new(attr, bytes))
            .collect();
        metadata.tiles = std::mem::take(&mut self.tiles);

        backend.put_metadata(&self.name, &metadata.to_bytes()?)?;
        backend.commit(&self.name)?;
        log::info!(
            "committed fragment '{}' ({} cells, {} tiles)",
            self.name,
            metadata.cell_count,
            metadata.tile_count()
        );
        Ok(metadata)
    }
}
