use std::fmt;
use std::sync::Arc;

use crate::buffer::{build_batch, BufferSet};
use crate::fragment::{new_fragment_name, FragmentWriter};
use crate::layout::{resolve_write_order, Layout};
use crate::schema::ArraySchema;
use crate::storage::StorageBackend;

use super::error::QueryError;

/// Handle to an array opened for writing.
///
/// Pairs the immutable schema with a storage backend and hands out write
/// queries. The handle itself is cheap to clone and carries no write
/// state.
#[derive(Clone)]
pub struct Array {
    schema: Arc<ArraySchema>,
    backend: Arc<dyn StorageBackend>,
}

impl Array {
    /// Open an array for writing against the given backend
    pub fn new(schema: Arc<ArraySchema>, backend: Arc<dyn StorageBackend>) -> Self {
        Self { schema, backend }
    }

    /// The array's schema
    pub fn schema(&self) -> &ArraySchema {
        &self.schema
    }

    /// Start a write query under the given layout
    pub fn open_write<'buf>(&self, layout: Layout) -> WriteQuery<'buf> {
        log::debug!(
            "opening {:?} write query on array '{}'",
            layout,
            self.schema.name
        );
        WriteQuery {
            schema: Arc::clone(&self.schema),
            backend: Arc::clone(&self.backend),
            layout,
            buffers: BufferSet::new(),
            global_writer: None,
            last_coords: None,
            fragments: Vec::new(),
            cells_written: 0,
            submissions: 0,
            finalized: false,
            aborted: false,
        }
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("schema", &self.schema.name)
            .finish()
    }
}

/// Summary of a finished write query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStats {
    /// Names of the fragments the query committed, in commit order
    pub fragments: Vec<String>,
    /// Total cells written across all submissions
    pub cells_written: u64,
    /// Number of submissions the query accepted
    pub submissions: u64,
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cells in {} fragments over {} submissions",
            self.cells_written,
            self.fragments.len(),
            self.submissions
        )
    }
}

/// A write query: attach buffers, submit one or more times, finalize.
///
/// Layout fixes the submission semantics for the query's whole lifetime:
///
/// * [`Layout::Unordered`]: each submission is sorted into global order
///   and committed as its own fragment before `submit` returns. Two
///   submissions yield two fragments.
/// * [`Layout::GlobalOrder`]: submissions must already follow the global
///   cell order, across submission boundaries too. Cells accumulate in a
///   single fragment that only [`finalize`](Self::finalize) commits.
///
/// Dropping or [`close`](Self::close)-ing a query without finalizing
/// discards any accumulated global-order cells; the unsealed fragment
/// never becomes visible. A storage failure partway through a
/// global-order submission likewise abandons the accumulated fragment,
/// and the query then rejects every call with [`QueryError::Aborted`].
pub struct WriteQuery<'buf> {
    schema: Arc<ArraySchema>,
    backend: Arc<dyn StorageBackend>,
    layout: Layout,
    buffers: BufferSet<'buf>,
    global_writer: Option<FragmentWriter>,
    last_coords: Option<Vec<u64>>,
    fragments: Vec<String>,
    cells_written: u64,
    submissions: u64,
    finalized: bool,
    aborted: bool,
}

impl<'buf> WriteQuery<'buf> {
    /// Attach the interleaved coordinates buffer for the next submission
    pub fn set_coords(&mut self, coords: &'buf [u64]) -> Result<(), QueryError> {
        self.check_open()?;
        self.buffers.set_coords(coords);
        Ok(())
    }

    /// Attach a fixed-length attribute's values buffer
    pub fn set_buffer(&mut self, name: &str, data: &'buf [u8]) -> Result<(), QueryError> {
        self.check_open()?;
        self.buffers.set_fixed(&self.schema, name, data)?;
        Ok(())
    }

    /// Attach a variable-length attribute's offsets and values buffers
    pub fn set_buffer_var(
        &mut self,
        name: &str,
        offsets: &'buf [u64],
        values: &'buf [u8],
    ) -> Result<(), QueryError> {
        self.check_open()?;
        self.buffers.set_var(&self.schema, name, offsets, values)?;
        Ok(())
    }

    fn check_open(&self) -> Result<(), QueryError> {
        if self.aborted {
            return Err(QueryError::Aborted);
        }
        if self.finalized {
            return Err(QueryError::FragmentSealed);
        }
        Ok(())
    }

    /// The layout the query was opened with
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Validate the attached buffers and write their cells.
    ///
    /// Nothing is retained from the caller's buffers after this returns;
    /// they may be reused or re-attached for the next submission.
    pub fn submit(&mut self) -> Result<(), QueryError> {
        self.check_open()?;

        let batch = build_batch(&self.schema, &self.buffers)?;
        self.submissions += 1;
        if batch.is_empty() {
            log::debug!("empty submission on array '{}', nothing written", self.schema.name);
            return Ok(());
        }

        let order = resolve_write_order(
            &self.schema.domain,
            &batch,
            self.layout,
            self.last_coords.as_deref(),
        )?;

        match self.layout {
            Layout::Unordered => {
                let mut writer = FragmentWriter::create(
                    Arc::clone(&self.schema),
                    self.backend.as_ref(),
                    new_fragment_name(),
                )?;
                writer.append(&batch, &order)?;
                let metadata = writer.seal(self.backend.as_ref())?;
                self.cells_written += metadata.cell_count;
                self.fragments.push(metadata.fragment);
            }
            Layout::GlobalOrder => {
                if self.global_writer.is_none() {
                    self.global_writer = Some(FragmentWriter::create(
                        Arc::clone(&self.schema),
                        self.backend.as_ref(),
                        new_fragment_name(),
                    )?);
                }
                // resolve_write_order already vetted monotonicity, so the
                // identity permutation is safe to stream straight out
                if let Some(writer) = self.global_writer.as_mut() {
                    if let Err(err) = writer.append(&batch, &order) {
                        self.abandon();
                        return Err(err.into());
                    }
                }
                if let Some(&last) = order.last() {
                    self.last_coords = Some(batch.coords(last).to_vec());
                }
                self.cells_written += batch.cell_count() as u64;
            }
        }
        Ok(())
    }

    /// Seal any accumulated global-order fragment and finish the query.
    ///
    /// Unordered queries commit per submission, so finalize only closes
    /// the state machine and reports the stats.
    pub fn finalize(&mut self) -> Result<WriteStats, QueryError> {
        if self.aborted {
            return Err(QueryError::Aborted);
        }
        if self.finalized {
            return Err(QueryError::AlreadyFinalized);
        }
        if let Some(writer) = self.global_writer.take() {
            let metadata = writer.seal(self.backend.as_ref())?;
            self.fragments.push(metadata.fragment);
        }
        self.finalized = true;
        let stats = WriteStats {
            fragments: self.fragments.clone(),
            cells_written: self.cells_written,
            submissions: self.submissions,
        };
        log::info!("finalized write query on '{}': {}", self.schema.name, stats);
        Ok(stats)
    }

    /// Abandon the query, discarding any uncommitted cells
    pub fn close(mut self) {
        self.discard();
        self.finalized = true;
    }

    /// A storage failure mid-append leaves a half-written tile that
    /// cannot be rolled back. The whole uncommitted fragment is
    /// abandoned for external cleanup and the query stops accepting
    /// calls, so no later finalize can commit the partial data.
    fn abandon(&mut self) {
        if let Some(writer) = self.global_writer.take() {
            log::warn!(
                "submission on '{}' failed mid-write; abandoning fragment '{}' with {} uncommitted cells",
                self.schema.name,
                writer.name(),
                writer.cell_count()
            );
        }
        self.aborted = true;
    }

    fn discard(&mut self) {
        if let Some(writer) = self.global_writer.take() {
            log::warn!(
                "write query on '{}' closed without finalize; discarding {} uncommitted cells in fragment '{}'",
                self.schema.name,
                writer.cell_count(),
                writer.name()
            );
        }
    }
}

impl Drop for WriteQuery<'_> {
    fn drop(&mut self) {
        if !self.finalized {
            self.discard();
        }
    }
}
