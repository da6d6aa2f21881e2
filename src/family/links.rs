//! Adding and removing parent/child links between existing persons.
//!
//! Preconditions are checked here, in a fixed order, before the engine is
//! asked to edit anything.

use serde::Serialize;

use super::error::{FamilyError, Result};
use super::persons::check_id;
use super::relations::{
    add_child_relationship, has_circular_relationship, remove_child_relationship,
    validate_parent_count,
};
use super::types::Person;
use crate::store::PersonStore;

/// Both sides of a link after the edit was persisted.
#[derive(Debug, Clone, Serialize)]
pub struct LinkOutcome {
    pub parent: Person,
    pub child: Person,
}

/// Make `child_id` a child of `parent_id`.
///
/// Rejects, in order: malformed ids, a missing parent, a missing child, an
/// existing link, a child that already has two parents, and a link that would
/// make a person their own ancestor.
pub fn link_child(store: &mut dyn PersonStore, parent_id: &str, child_id: &str) -> Result<LinkOutcome> {
    check_id(parent_id, "Invalid person ID format")?;
    check_id(child_id, "Invalid child ID format")?;

    let (parent, child) = load_pair(store, parent_id, child_id)?;

    if parent.has_child(&child.id) {
        return Err(FamilyError::RelationshipExists);
    }

    let (updated_parent, updated_child) = add_child_relationship(&parent, &child);
    if !validate_parent_count(&updated_child) {
        return Err(FamilyError::TooManyParents(
            "Child already has maximum number of parents (2)",
        ));
    }

    let all = store.list_all()?;
    if has_circular_relationship(&all, &parent.id, &child.id) {
        return Err(FamilyError::CircularRelationship);
    }

    store.put(&updated_parent)?;
    store.put(&updated_child)?;

    tracing::info!(parent = %parent.id, child = %child.id, "child relationship added");
    Ok(LinkOutcome {
        parent: updated_parent,
        child: updated_child,
    })
}

/// Remove the link between `parent_id` and `child_id`.
pub fn unlink_child(store: &mut dyn PersonStore, parent_id: &str, child_id: &str) -> Result<LinkOutcome> {
    check_id(parent_id, "Invalid ID format")?;
    check_id(child_id, "Invalid ID format")?;

    let (parent, child) = load_pair(store, parent_id, child_id)?;

    if !parent.has_child(&child.id) {
        return Err(FamilyError::RelationshipNotExists);
    }

    let (updated_parent, updated_child) = remove_child_relationship(&parent, &child);
    store.put(&updated_parent)?;
    store.put(&updated_child)?;

    tracing::info!(parent = %parent.id, child = %child.id, "child relationship removed");
    Ok(LinkOutcome {
        parent: updated_parent,
        child: updated_child,
    })
}

fn load_pair(store: &dyn PersonStore, parent_id: &str, child_id: &str) -> Result<(Person, Person)> {
    let parent = store
        .get(parent_id)?
        .ok_or_else(|| FamilyError::ParentNotFound(parent_id.to_string()))?;
    let child = store
        .get(child_id)?
        .ok_or_else(|| FamilyError::ChildNotFound(child_id.to_string()))?;
    Ok((parent, child))
}
