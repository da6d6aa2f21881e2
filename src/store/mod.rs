//! Record store: one document per person plus a single tree-metadata document.
//!
//! Provides the [`PersonStore`] trait and two backends, created via
//! [`create_store`] from configuration:
//!
//! - [`json_dir::JsonDirStore`]: `<data_dir>/persons/<id>.json` and
//!   `<data_dir>/familyTree.json`
//! - [`memory::MemoryStore`]: process-local maps, used by tests
//!
//! "Not found" is always `Ok(None)`; only unexpected I/O or corrupt documents
//! are errors.

pub mod json_dir;
pub mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::family::types::{FamilyTree, Person};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt document {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid record key: {0:?}")]
    InvalidKey(String),
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Document persistence for persons and tree metadata.
///
/// Reads take `&self`; writes take `&mut self`, so a shared store is wrapped
/// in a `Mutex` by the caller. All methods are synchronous; async callers
/// should use `tokio::task::spawn_blocking`.
pub trait PersonStore: Send {
    fn get(&self, id: &str) -> Result<Option<Person>>;

    /// Insert or replace the document keyed by `person.id`.
    fn put(&mut self, person: &Person) -> Result<()>;

    /// Idempotent: deleting an absent record succeeds.
    fn delete(&mut self, id: &str) -> Result<()>;

    /// Every stored person, oldest first (ties broken by id).
    fn list_all(&self) -> Result<Vec<Person>>;

    /// Remove every person document without reading it, so unreadable
    /// documents go too. Returns how many documents were removed.
    fn clear(&mut self) -> Result<usize>;

    fn get_tree(&self) -> Result<Option<FamilyTree>>;

    fn put_tree(&mut self, tree: &FamilyTree) -> Result<()>;

    /// Idempotent, like [`PersonStore::delete`].
    fn delete_tree(&mut self) -> Result<()>;
}

/// Create a store from config.
///
/// Supported backends: `"json"` (default) and `"memory"`.
pub fn create_store(config: &crate::config::StorageConfig) -> anyhow::Result<Box<dyn PersonStore>> {
    match config.backend.as_str() {
        "json" => {
            let dir = crate::config::expand_tilde(&config.data_dir);
            let store = json_dir::JsonDirStore::open(&dir)?;
            Ok(Box::new(store))
        }
        "memory" => Ok(Box::new(memory::MemoryStore::new())),
        other => anyhow::bail!("unknown storage backend: {other}. Supported: json, memory"),
    }
}

/// Keys become file names, so reject anything that could escape the directory.
pub(crate) fn check_key(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(id.to_string()))
    }
}

pub(crate) fn sort_persons(persons: &mut [Person]) {
    persons.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
