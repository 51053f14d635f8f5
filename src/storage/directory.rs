use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::schema::{
    COMMIT_MARKER_FILE, FRAGMENT_DATA_FILE, FRAGMENT_METADATA_FILE, FRAGMENT_NAME_PREFIX,
};

use super::error::StorageError;
use super::{FragmentSink, StorageBackend};

/// Filesystem storage: one subdirectory per fragment under the array
/// directory, holding the data stream, the metadata document and the
/// commit marker.
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
}

impl DirectoryBackend {
    /// Open (creating if needed) the array directory at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The array directory this backend writes under
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn fragment_dir(&self, fragment: &str) -> PathBuf {
        self.root.join(fragment)
    }
}

struct FileSink {
    file: File,
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl FragmentSink for FileSink {
    fn sync(&mut self) -> Result<(), StorageError> {
        self.file.sync_all()?;
        Ok(())
    }
}

impl StorageBackend for DirectoryBackend {
    fn create(&self, fragment: &str) -> Result<Box<dyn FragmentSink>, StorageError> {
        let dir = self.fragment_dir(fragment);
        if dir.exists() {
            return Err(StorageError::AlreadyExists(fragment.to_string()));
        }
        fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create_new(true)
            .append(true)
            .open(dir.join(FRAGMENT_DATA_FILE))?;
        Ok(Box::new(FileSink { file }))
    }

    fn put_metadata(&self, fragment: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let dir = self.fragment_dir(fragment);
        if !dir.is_dir() {
            return Err(StorageError::NotFound(fragment.to_string()));
        }
        // Stage into a temp file in the same directory, then rename: the
        // metadata document is either absent or complete, never torn.
        let mut staged = tempfile::NamedTempFile::new_in(&dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged
            .persist(dir.join(FRAGMENT_METADATA_FILE))
            .map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }

    fn commit(&self, fragment: &str) -> Result<(), StorageError> {
        let dir = self.fragment_dir(fragment);
        if !dir.is_dir() {
            return Err(StorageError::NotFound(fragment.to_string()));
        }
        let marker = File::create(dir.join(COMMIT_MARKER_FILE))?;
        marker.sync_all()?;
        Ok(())
    }

    fn list_committed(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(FRAGMENT_NAME_PREFIX) || !entry.path().is_dir() {
                continue;
            }
            if entry.path().join(COMMIT_MARKER_FILE).is_file() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_metadata(&self, fragment: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.fragment_dir(fragment).join(FRAGMENT_METADATA_FILE);
        if !path.is_file() {
            return Err(StorageError::NotFound(fragment.to_string()));
        }
        Ok(fs::read(path)?)
    }

    fn read_at(&self, fragment: &str, offset: u64, len: u64) -> Result<Vec<u8>, StorageError> {
        let path = self.fragment_dir(fragment).join(FRAGMENT_DATA_FILE);
        if !path.is_file() {
            return Err(StorageError::NotFound(fragment.to_string()));
        }
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();
        // checked_add: offset and len come from metadata that may be
        // corrupt, and the sum can wrap
        if offset.checked_add(len).map_or(true, |end| end > size) {
            return Err(StorageError::OutOfBounds {
                fragment: fragment.to_string(),
                offset,
                len,
                size,
            });
        }
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len as usize];
        file.read_exact(&mut buf)?;
        Ok(buf)
    }
}
