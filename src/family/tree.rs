//! Family tree metadata: initialization with one or two founders, reading the
//! tree with its live person list, wiping it, and auditing it.

use chrono::Utc;

use super::error::{FamilyError, Result};
use super::integrity::{validate_tree_integrity, IntegrityReport};
use super::relations;
use super::types::{FamilyTree, NewPerson, Person};
use super::validation;
use crate::store::PersonStore;

/// The stored tree with `persons` refreshed from the store, or `None` if the
/// tree was never initialized.
pub fn load_tree(store: &dyn PersonStore) -> Result<Option<FamilyTree>> {
    let Some(tree) = store.get_tree()? else {
        return Ok(None);
    };
    Ok(Some(FamilyTree {
        persons: store.list_all()?,
        updated_at: Utc::now(),
        ..tree
    }))
}

/// Create the tree and its founders. Founders never get parents; two founders
/// are recorded as each other's spouse.
pub fn initialize_tree(store: &mut dyn PersonStore, founders: Vec<NewPerson>) -> Result<FamilyTree> {
    validation::validate_initialize(&founders)
        .map_err(|details| FamilyError::validation("Invalid initialization data", details))?;

    if store.get_tree()?.is_some() {
        return Err(FamilyError::TreeAlreadyExists);
    }

    let mut persons: Vec<Person> = founders
        .into_iter()
        .map(|founder| {
            relations::create_person(NewPerson {
                parent_ids: Vec::new(),
                spouse_id: None,
                ..founder
            })
        })
        .collect();

    if let [first, second] = persons.as_mut_slice() {
        first.spouse_id = Some(second.id.clone());
        second.spouse_id = Some(first.id.clone());
    }

    for person in &persons {
        store.put(person)?;
    }

    let now = Utc::now();
    let tree = FamilyTree {
        id: format!("tree-{}", now.timestamp_millis()),
        name: tree_name(&persons),
        root_person_ids: persons.iter().map(|p| p.id.clone()).collect(),
        persons,
        created_at: now,
        updated_at: now,
    };
    store.put_tree(&tree)?;

    tracing::info!(id = %tree.id, name = %tree.name, "family tree initialized");
    Ok(tree)
}

/// Delete every person and the tree metadata. Returns how many persons were removed.
pub fn clear_tree(store: &mut dyn PersonStore) -> Result<usize> {
    let deleted = store.clear()?;
    store.delete_tree()?;

    tracing::info!(deleted, "family tree deleted");
    Ok(deleted)
}

/// Run [`validate_tree_integrity`] over everything in the store.
pub fn audit(store: &dyn PersonStore) -> Result<IntegrityReport> {
    let persons = store.list_all()?;
    let report = validate_tree_integrity(&persons);
    if !report.is_valid {
        tracing::warn!(errors = report.errors.len(), "integrity check found problems");
    }
    Ok(report)
}

fn tree_name(founders: &[Person]) -> String {
    match founders {
        [only] => format!("{}'s Family Tree", only.full_name),
        [first, second, ..] => format!("{} & {}'s Family Tree", first.full_name, second.full_name),
        [] => "Family Tree".to_string(),
    }
}
