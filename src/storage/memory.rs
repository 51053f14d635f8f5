use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::error::StorageError;
use super::{FragmentSink, StorageBackend};

#[derive(Debug, Default)]
struct MemFragment {
    data: Vec<u8>,
    metadata: Option<Vec<u8>>,
    committed: bool,
}

#[derive(Debug, Default)]
struct MemState {
    fragments: HashMap<String, MemFragment>,
}

/// In-memory storage backend.
///
/// Keeps every fragment's data stream, metadata and commit flag in a
/// shared map. Useful for tests and for tooling that assembles fragments
/// without touching a filesystem; cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemState>>,
}

impl MemoryBackend {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw data stream of a fragment, committed or not.
    ///
    /// Intended for tests asserting on serialized tile bytes.
    pub fn raw_data(&self, fragment: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().ok()?;
        state.fragments.get(fragment).map(|f| f.data.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemState>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::Io(io::Error::new(io::ErrorKind::Other, "memory backend lock poisoned")))
    }
}

struct MemorySink {
    state: Arc<Mutex<MemState>>,
    fragment: String,
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory backend lock poisoned"))?;
        let frag = state
            .fragments
            .get_mut(&self.fragment)
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "fragment vanished"))?;
        frag.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FragmentSink for MemorySink {
    fn sync(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl StorageBackend for MemoryBackend {
    fn create(&self, fragment: &str) -> Result<Box<dyn FragmentSink>, StorageError> {
        let mut state = self.lock()?;
        if state.fragments.contains_key(fragment) {
            return Err(StorageError::AlreadyExists(fragment.to_string()));
        }
        state
            .fragments
            .insert(fragment.to_string(), MemFragment::default());
        Ok(Box::new(MemorySink {
            state: Arc::clone(&self.state),
            fragment: fragment.to_string(),
        }))
    }

    fn put_metadata(&self, fragment: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let frag = state
            .fragments
            .get_mut(fragment)
            .ok_or_else(|| StorageError::NotFound(fragment.to_string()))?;
        frag.metadata = Some(bytes.to_vec());
        Ok(())
    }

    fn commit(&self, fragment: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let frag = state
            .fragments
            .get_mut(fragment)
            .ok_or_else(|| StorageError::NotFound(fragment.to_string()))?;
        frag.committed = true;
        Ok(())
    }

    fn list_committed(&self) -> Result<Vec<String>, StorageError> {
        let state = self.lock()?;
        let mut names: Vec<String> = state
            .fragments
            .iter()
            .filter(|(_, f)| f.committed)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_metadata(&self, fragment: &str) -> Result<Vec<u8>, StorageError> {
        let state = self.lock()?;
        state
            .fragments
            .get(fragment)
            .and_then(|f| f.metadata.clone())
            .ok_or_else(|| StorageError::NotFound(fragment.to_string()))
    }

    fn read_at(&self, fragment: &str, offset: u64, len: u64) -> Result<Vec<u8>, StorageError> {
        let state = self.lock()?;
        let frag = state
            .fragments
            .get(fragment)
            .ok_or_else(|| StorageError::NotFound(fragment.to_string()))?;
        let size = frag.data.len() as u64;
        // checked_add: offset and len come from metadata that may be
        // corrupt, and the sum can wrap
        let end = match offset.checked_add(len) {
            Some(end) if end <= size => end,
            _ => {
                return Err(StorageError::OutOfBounds {
                    fragment: fragment.to_string(),
                    offset,
                    len,
                    size,
                })
            }
        };
        Ok(frag.data[offset as usize..end as usize].to_vec())
    }
}
