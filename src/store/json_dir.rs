//! Directory-of-JSON-documents backend.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{check_key, sort_persons, PersonStore, Result, StoreError};
use crate::family::types::{FamilyTree, Person};

const PERSONS_DIR: &str = "persons";
const TREE_FILE: &str = "familyTree.json";

/// Stores each person at `<root>/persons/<id>.json` and the tree metadata at
/// `<root>/familyTree.json`, pretty-printed.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let persons = root.join(PERSONS_DIR);
        fs::create_dir_all(&persons).map_err(|e| StoreError::io("create directory", &persons, e))?;
        tracing::info!(path = %root.display(), "data directory ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn person_path(&self, id: &str) -> Result<PathBuf> {
        check_key(id)?;
        Ok(self.root.join(PERSONS_DIR).join(format!("{id}.json")))
    }

    fn tree_path(&self) -> PathBuf {
        self.root.join(TREE_FILE)
    }
}

impl PersonStore for JsonDirStore {
    fn get(&self, id: &str) -> Result<Option<Person>> {
        read_json(&self.person_path(id)?)
    }

    fn put(&mut self, person: &Person) -> Result<()> {
        write_json(&self.person_path(&person.id)?, person)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        remove_file(&self.person_path(id)?)
    }

    fn list_all(&self) -> Result<Vec<Person>> {
        let dir = self.root.join(PERSONS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io("list", &dir, e)),
        };

        let mut persons = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("list", &dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // Removed between listing and reading: skip.
            if let Some(person) = read_json::<Person>(&path)? {
                persons.push(person);
            }
        }

        sort_persons(&mut persons);
        Ok(persons)
    }

    fn clear(&mut self) -> Result<usize> {
        let dir = self.root.join(PERSONS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::io("list", &dir, e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("list", &dir, e))?;
            let path = entry.path();
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => {
                    remove_file(&path)?;
                    removed += 1;
                }
                // Left behind by an interrupted write.
                Some("tmp") => remove_file(&path)?,
                _ => {}
            }
        }
        Ok(removed)
    }

    fn get_tree(&self) -> Result<Option<FamilyTree>> {
        read_json(&self.tree_path())
    }

    fn put_tree(&mut self, tree: &FamilyTree) -> Result<()> {
        write_json(&self.tree_path(), tree)
    }

    fn delete_tree(&mut self) -> Result<()> {
        remove_file(&self.tree_path())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io("read", path, e)),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Write via a temp file + rename so a reader never sees a partial document.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).map_err(|e| StoreError::io("write", &tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| StoreError::io("rename", path, e))
}

fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io("delete", path, e)),
    }
}
