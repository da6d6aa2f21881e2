//! Person lifecycle against a [`PersonStore`]: list, lookup, create, edit,
//! delete, and lineage queries.
//!
//! Each call loads what it needs from the store, runs the engine in
//! [`super::relations`], and writes back only the records that changed.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Serialize;

use super::error::{FamilyError, Result};
use super::relations::{self, remove_child_relationship, validate_parent_count};
use super::types::{DeletionStrategy, NewPerson, Person, PersonUpdate};
use super::validation;
use crate::store::PersonStore;

/// Result returned from a delete operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub id: String,
    pub strategy: DeletionStrategy,
    /// Number of children the person had when the delete started.
    pub children_affected: usize,
    /// Every record removed, descendants first for a cascade.
    pub deleted_ids: Vec<String>,
}

pub fn list_persons(store: &dyn PersonStore) -> Result<Vec<Person>> {
    Ok(store.list_all()?)
}

pub fn find_person(store: &dyn PersonStore, id: &str) -> Result<Person> {
    check_id(id, "Invalid person ID format")?;
    store
        .get(id)?
        .ok_or_else(|| FamilyError::PersonNotFound(id.to_string()))
}

/// Validate `input`, create the person, and append it to each parent's
/// `children_ids`.
pub fn add_person(store: &mut dyn PersonStore, input: NewPerson) -> Result<Person> {
    validation::validate_new_person(&input)
        .map_err(|details| FamilyError::validation("Invalid person data", details))?;

    let mut parents = Vec::with_capacity(input.parent_ids.len());
    for parent_id in &input.parent_ids {
        let parent = store
            .get(parent_id)?
            .ok_or_else(|| FamilyError::UnknownParent(parent_id.clone()))?;
        parents.push(parent);
    }

    let person = relations::create_person(input);
    if !validate_parent_count(&person) {
        return Err(FamilyError::TooManyParents(
            "A person cannot have more than 2 parents",
        ));
    }

    store.put(&person)?;
    for parent in &parents {
        let (parent, _) = relations::add_child_relationship(parent, &person);
        store.put(&parent)?;
    }

    tracing::info!(id = %person.id, parents = parents.len(), "person created");
    Ok(person)
}

/// Overlay `update` onto the stored person. `full_name` is recomputed when
/// either name part changes.
pub fn edit_person(store: &mut dyn PersonStore, id: &str, update: PersonUpdate) -> Result<Person> {
    check_id(id, "Invalid person ID format")?;
    validation::validate_person_update(&update)
        .map_err(|details| FamilyError::validation("Invalid update data", details))?;

    let mut person = store
        .get(id)?
        .ok_or_else(|| FamilyError::PersonNotFound(id.to_string()))?;

    let renamed = update.touches_name();
    update.apply_to(&mut person);
    person.updated_at = Utc::now();
    if renamed {
        person = relations::update_full_name(&person);
    }

    store.put(&person)?;
    tracing::info!(id = %person.id, renamed, "person updated");
    Ok(person)
}

/// Parse the `strategy` query value; absent means [`DeletionStrategy::Orphan`].
pub fn parse_strategy(raw: Option<&str>) -> Result<DeletionStrategy> {
    match raw {
        None => Ok(DeletionStrategy::default()),
        Some(s) => s
            .parse()
            .map_err(|_| FamilyError::InvalidDeletionStrategy(s.to_string())),
    }
}

/// Delete a person.
///
/// `Orphan` unlinks the person from its parents and children and removes only
/// that record. `Cascade` first removes every descendant (as computed before
/// any deletion), each unlinked from all of its recorded parents, including
/// parents outside the deleted lineage.
pub fn remove_person(
    store: &mut dyn PersonStore,
    id: &str,
    strategy: DeletionStrategy,
) -> Result<DeleteOutcome> {
    check_id(id, "Invalid person ID format")?;
    let all = store.list_all()?;
    let Some(person) = all.iter().find(|p| p.id == id) else {
        return Err(FamilyError::PersonNotFound(id.to_string()));
    };
    let children_affected = person.children_ids.len();

    let doomed: Vec<String> = match strategy {
        DeletionStrategy::Orphan => Vec::new(),
        DeletionStrategy::Cascade => relations::get_descendants(&all, id)
            .into_iter()
            .map(|p| p.id.clone())
            .collect(),
    };

    let mut household = Household::new(all);
    for descendant_id in &doomed {
        household.detach_and_remove(descendant_id);
    }
    household.detach_and_remove(id);

    let deleted_ids = household.removed.clone();
    household.persist(store)?;
    prune_root_ids(store, &deleted_ids)?;

    tracing::info!(
        id = %id,
        strategy = %strategy,
        deleted = deleted_ids.len(),
        "person deleted"
    );

    Ok(DeleteOutcome {
        id: id.to_string(),
        strategy,
        children_affected,
        deleted_ids,
    })
}

pub fn ancestors_of(store: &dyn PersonStore, id: &str) -> Result<Vec<Person>> {
    lineage(store, id, relations::get_ancestors)
}

pub fn descendants_of(store: &dyn PersonStore, id: &str) -> Result<Vec<Person>> {
    lineage(store, id, relations::get_descendants)
}

fn lineage(
    store: &dyn PersonStore,
    id: &str,
    walk: for<'a> fn(&'a [Person], &str) -> Vec<&'a Person>,
) -> Result<Vec<Person>> {
    check_id(id, "Invalid person ID format")?;
    let all = store.list_all()?;
    if !all.iter().any(|p| p.id == id) {
        return Err(FamilyError::PersonNotFound(id.to_string()));
    }
    Ok(walk(&all, id).into_iter().cloned().collect())
}

pub(crate) fn check_id(id: &str, message: &str) -> Result<()> {
    validation::validate_person_id("id", id)
        .map_err(|details| FamilyError::validation(message, details))
}

fn prune_root_ids(store: &mut dyn PersonStore, deleted: &[String]) -> Result<()> {
    let Some(mut tree) = store.get_tree()? else {
        return Ok(());
    };
    let before = tree.root_person_ids.len();
    tree.root_person_ids.retain(|id| !deleted.contains(id));
    if tree.root_person_ids.len() != before {
        tree.updated_at = Utc::now();
        store.put_tree(&tree)?;
    }
    Ok(())
}

/// Working copy of the whole dataset for a multi-record edit. Tracks which
/// records changed and which were removed so only those are written back.
struct Household {
    persons: HashMap<String, Person>,
    touched: Vec<String>,
    touched_set: HashSet<String>,
    removed: Vec<String>,
}

impl Household {
    fn new(all: Vec<Person>) -> Self {
        Self {
            persons: all.into_iter().map(|p| (p.id.clone(), p)).collect(),
            touched: Vec::new(),
            touched_set: HashSet::new(),
            removed: Vec::new(),
        }
    }

    /// Unlink `id` from every recorded parent and child, then drop it.
    fn detach_and_remove(&mut self, id: &str) {
        let Some(person) = self.persons.remove(id) else {
            return;
        };

        for parent_id in &person.parent_ids {
            if let Some(parent) = self.persons.get(parent_id) {
                let (parent, _) = remove_child_relationship(parent, &person);
                self.replace(parent);
            }
        }
        for child_id in &person.children_ids {
            if let Some(child) = self.persons.get(child_id) {
                let (_, child) = remove_child_relationship(&person, child);
                self.replace(child);
            }
        }

        self.removed.push(person.id);
    }

    fn replace(&mut self, person: Person) {
        if self.touched_set.insert(person.id.clone()) {
            self.touched.push(person.id.clone());
        }
        self.persons.insert(person.id.clone(), person);
    }

    /// Write surviving changed records first, then delete removed ones.
    fn persist(self, store: &mut dyn PersonStore) -> Result<()> {
        for id in &self.touched {
            if let Some(person) = self.persons.get(id) {
                store.put(person)?;
            }
        }
        for id in &self.removed {
            store.delete(id)?;
        }
        Ok(())
    }
}
