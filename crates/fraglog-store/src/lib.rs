//! Storage for fraglog.
//!
//! The merge engine works on text only; this crate moves that text in and
//! out of the filesystem.
//!
//! # Stores
//!
//! - [`FragmentStore`] -- enumerate, create, and delete fragment files
//!   - [`DirFragmentStore`] -- `*.md` files in one directory
//!   - [`InMemoryFragmentStore`] -- ordered in-memory store for tests and embedding
//! - [`DocumentStore`] -- read and replace the changelog as a whole
//!   - [`FileDocumentStore`] -- atomic temp-file-and-rename writes
//!   - [`InMemoryDocumentStore`]
//! - [`HistoryLog`] -- run log collected in memory, prepended to a file once
//!
//! # Design Rules
//!
//! 1. Fragments are listed in a stable order (file name order on disk).
//! 2. A document write either replaces the whole file or leaves it untouched.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod document;
pub mod error;
pub mod fragments;
pub mod history;

pub use document::{DocumentStore, FileDocumentStore, InMemoryDocumentStore};
pub use error::{StoreError, StoreResult};
pub use fragments::{
    random_id, DirFragmentStore, FragmentStore, InMemoryFragmentStore, RawFragment,
    FRAGMENT_EXTENSION,
};
pub use history::HistoryLog;
