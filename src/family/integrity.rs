//! Whole-dataset consistency audit.
//!
//! [`validate_tree_integrity`] never mutates or fails; it reports every broken
//! invariant it finds as a human-readable line.

use serde::Serialize;

use super::relations::{index_by_id, reaches_upward, validate_parent_count};
use super::types::Person;

/// Result of an integrity audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// `true` iff `errors` is empty.
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check parent cap, reference existence, link symmetry and acyclicity for
/// every person in `persons`.
pub fn validate_tree_integrity(persons: &[Person]) -> IntegrityReport {
    let index = index_by_id(persons);
    let mut errors = Vec::new();

    for person in persons {
        if !validate_parent_count(person) {
            errors.push(format!("Person {} has more than 2 parents", person.full_name));
        }

        for parent_id in &person.parent_ids {
            match index.get(parent_id.as_str()) {
                None => errors.push(format!(
                    "Person {} references non-existent parent {parent_id}",
                    person.full_name
                )),
                Some(parent) if !parent.has_child(&person.id) => errors.push(format!(
                    "Parent {} doesn't have {} in their children list",
                    parent.full_name, person.full_name
                )),
                Some(_) => {}
            }
        }

        for child_id in &person.children_ids {
            match index.get(child_id.as_str()) {
                None => errors.push(format!(
                    "Person {} references non-existent child {child_id}",
                    person.full_name
                )),
                Some(child) if !child.has_parent(&person.id) => errors.push(format!(
                    "Child {} doesn't have {} in their parents list",
                    child.full_name, person.full_name
                )),
                Some(_) => {}
            }
        }

        for child_id in &person.children_ids {
            if reaches_upward(&index, &person.id, child_id) {
                errors.push(format!(
                    "Circular relationship detected involving {}",
                    person.full_name
                ));
            }
        }
    }

    IntegrityReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
