use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};

/// File extension of fragment files.
pub const FRAGMENT_EXTENSION: &str = "md";

/// Length of the random part of a fragment file name.
const ID_LENGTH: usize = 8;

const MAX_CREATE_ATTEMPTS: usize = 16;

/// A fragment as stored: identifier and raw text, not yet parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFragment {
    pub id: String,
    pub contents: String,
}

/// Source of pending fragments.
///
/// Implementations must list fragments in a stable order; that order is the
/// order in which entries appear in the changelog.
pub trait FragmentStore: Send + Sync {
    /// All pending fragments in enumeration order.
    fn list(&self) -> StoreResult<Vec<RawFragment>>;

    /// Store a new fragment under a fresh random identifier and return it.
    fn create(&self, contents: &str) -> StoreResult<String>;

    /// Delete a fragment. Returns `true` if it existed.
    fn remove(&self, id: &str) -> StoreResult<bool>;
}

/// Random alphanumeric string of `len` characters.
pub fn random_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn fragment_name() -> String {
    format!("{}.{FRAGMENT_EXTENSION}", random_id(ID_LENGTH))
}

/// Fragments kept as `*.md` files directly inside one directory.
#[derive(Clone, Debug)]
pub struct DirFragmentStore {
    dir: PathBuf,
}

impl DirFragmentStore {
    /// Open the store, creating the directory if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Use `dir` without creating it. Listing a missing directory yields no
    /// fragments, so read-only commands leave the tree untouched.
    pub fn existing(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The fragment directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the fragment file for `id`.
    pub fn path_of(&self, id: &str) -> StoreResult<PathBuf> {
        let is_plain = !id.is_empty()
            && Path::new(id).file_name().map(|n| n == id).unwrap_or(false);
        if !is_plain {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(id))
    }
}

impl FragmentStore for DirFragmentStore {
    fn list(&self) -> StoreResult<Vec<RawFragment>> {
        let mut fragments = Vec::new();
        if !self.dir.is_dir() {
            debug!(dir = %self.dir.display(), "fragment directory does not exist");
            return Ok(fragments);
        }

        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_fragment = entry
                .path()
                .extension()
                .map(|ext| ext == FRAGMENT_EXTENSION)
                .unwrap_or(false);
            if !is_fragment {
                continue;
            }

            let id = entry.file_name().to_string_lossy().into_owned();
            let bytes = fs::read(entry.path())?;
            let contents = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    warn!(%id, "fragment is not valid UTF-8, decoding lossily");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            fragments.push(RawFragment { id, contents });
        }

        debug!(dir = %self.dir.display(), count = fragments.len(), "listed fragments");
        Ok(fragments)
    }

    fn create(&self, contents: &str) -> StoreResult<String> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let id = fragment_name();
            let path = self.dir.join(&id);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(contents.as_bytes())?;
            file.flush()?;
            debug!(path = %path.display(), "created fragment");
            return Ok(id);
        }
        Err(StoreError::NameExhausted(MAX_CREATE_ATTEMPTS))
    }

    fn remove(&self, id: &str) -> StoreResult<bool> {
        let path = self.path_of(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed fragment");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory fragment store that lists in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryFragmentStore {
    fragments: RwLock<Vec<RawFragment>>,
}

impl InMemoryFragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment with a chosen identifier, replacing any with the same id.
    pub fn insert(&self, id: impl Into<String>, contents: impl Into<String>) {
        let fragment = RawFragment {
            id: id.into(),
            contents: contents.into(),
        };
        let mut fragments = self.fragments.write().expect("lock poisoned");
        match fragments.iter_mut().find(|f| f.id == fragment.id) {
            Some(existing) => *existing = fragment,
            None => fragments.push(fragment),
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers in listing order.
    pub fn ids(&self) -> Vec<String> {
        self.fragments
            .read()
            .expect("lock poisoned")
            .iter()
            .map(|f| f.id.clone())
            .collect()
    }
}

impl FragmentStore for InMemoryFragmentStore {
    fn list(&self) -> StoreResult<Vec<RawFragment>> {
        Ok(self.fragments.read().expect("lock poisoned").clone())
    }

    fn create(&self, contents: &str) -> StoreResult<String> {
        let mut fragments = self.fragments.write().expect("lock poisoned");
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let id = fragment_name();
            if fragments.iter().any(|f| f.id == id) {
                continue;
            }
            fragments.push(RawFragment {
                id: id.clone(),
                contents: contents.to_string(),
            });
            return Ok(id);
        }
        Err(StoreError::NameExhausted(MAX_CREATE_ATTEMPTS))
    }

    fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut fragments = self.fragments.write().expect("lock poisoned");
        let before = fragments.len();
        fragments.retain(|f| f.id != id);
        Ok(fragments.len() != before)
    }
}
