//! In-process backend. Nothing survives a restart.

use std::collections::HashMap;

use super::{check_key, sort_persons, PersonStore, Result};
use crate::family::types::{FamilyTree, Person};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    persons: HashMap<String, Person>,
    tree: Option<FamilyTree>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersonStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<Person>> {
        Ok(self.persons.get(id).cloned())
    }

    fn put(&mut self, person: &Person) -> Result<()> {
        check_key(&person.id)?;
        self.persons.insert(person.id.clone(), person.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.persons.remove(id);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Person>> {
        let mut persons: Vec<Person> = self.persons.values().cloned().collect();
        sort_persons(&mut persons);
        Ok(persons)
    }

    fn clear(&mut self) -> Result<usize> {
        let removed = self.persons.len();
        self.persons.clear();
        Ok(removed)
    }

    fn get_tree(&self) -> Result<Option<FamilyTree>> {
        Ok(self.tree.clone())
    }

    fn put_tree(&mut self, tree: &FamilyTree) -> Result<()> {
        self.tree = Some(tree.clone());
        Ok(())
    }

    fn delete_tree(&mut self) -> Result<()> {
        self.tree = None;
        Ok(())
    }
}
