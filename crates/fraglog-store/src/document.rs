//! Whole-document changelog storage.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// The changelog document, read and written as a single blob.
pub trait DocumentStore: Send + Sync {
    /// Read the full document.
    fn read(&self) -> StoreResult<String>;

    /// Replace the full document.
    fn write(&self, contents: &str) -> StoreResult<()>;
}

/// A changelog file on disk.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers never see a partial document.
#[derive(Clone, Debug)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileDocumentStore {
    fn read(&self) -> StoreResult<String> {
        fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io(e),
        })
    }

    fn write(&self, contents: &str) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)?;

        debug!(path = %self.path.display(), bytes = contents.len(), "wrote document");
        Ok(())
    }
}

/// In-memory document for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    contents: RwLock<Option<String>>,
    writes: RwLock<usize>,
}

impl InMemoryDocumentStore {
    /// A store holding `contents`.
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(Some(contents.into())),
            writes: RwLock::new(0),
        }
    }

    /// A store with no document; reads fail with `NotFound`.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Current contents, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.read().expect("lock poisoned").clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        *self.writes.read().expect("lock poisoned")
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self) -> StoreResult<String> {
        self.contents()
            .ok_or_else(|| StoreError::NotFound(PathBuf::from("<memory>")))
    }

    fn write(&self, contents: &str) -> StoreResult<()> {
        *self.contents.write().expect("lock poisoned") = Some(contents.to_string());
        *self.writes.write().expect("lock poisoned") += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("CHANGELOG.md"));
        assert!(matches!(store.read(), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "old").unwrap();

        let store = FileDocumentStore::new(&path);
        assert_eq!(store.read().unwrap(), "old");
        store.write("## [1.0.0]\n### Added\n- a\n").unwrap();
        assert_eq!(store.read().unwrap(), "## [1.0.0]\n### Added\n- a\n");
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("CHANGELOG.md"));
        store.write("a").unwrap();
        store.write("b").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["CHANGELOG.md"]);
    }

    #[test]
    fn write_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs").join("CHANGELOG.md");
        FileDocumentStore::new(&path).write("x").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
    }

    #[test]
    fn in_memory_store() {
        let store = InMemoryDocumentStore::new("doc");
        assert_eq!(store.read().unwrap(), "doc");
        store.write("new").unwrap();
        assert_eq!(store.contents().as_deref(), Some("new"));
        assert_eq!(store.write_count(), 1);

        let missing = InMemoryDocumentStore::missing();
        assert!(matches!(missing.read(), Err(StoreError::NotFound(_))));
    }
}
