//! Relationship engine.
//!
//! Pure functions over a snapshot of [`Person`] records. Nothing here touches
//! storage; callers load the records, run the precondition checks they need
//! ([`validate_parent_count`], [`Person::has_child`], [`has_circular_relationship`]),
//! apply an edit, and persist whatever came back changed.
//!
//! Traversals keep an explicit visited set, so already-cyclic or dangling data
//! never loops or panics: missing ids are treated as dead ends.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::Utc;

use super::types::{NewPerson, Person};

/// Maximum number of parents a person may have.
pub const MAX_PARENTS: usize = 2;

/// Build a new person with a fresh UUID v7, derived `full_name`, no children,
/// and both timestamps set to now. Parent existence is the caller's concern.
pub fn create_person(input: NewPerson) -> Person {
    let now = Utc::now();
    Person {
        id: uuid::Uuid::now_v7().to_string(),
        full_name: full_name_of(&input.first_name, &input.last_name),
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        date_of_birth: input.date_of_birth,
        place_of_birth: input.place_of_birth,
        phone_number: input.phone_number,
        profile_photo: input.profile_photo,
        parent_ids: input.parent_ids,
        children_ids: Vec::new(),
        spouse_id: input.spouse_id,
        notes: input.notes,
        created_at: now,
        updated_at: now,
    }
}

/// Recompute `full_name` from the current name parts and bump `updated_at`.
pub fn update_full_name(person: &Person) -> Person {
    Person {
        full_name: full_name_of(&person.first_name, &person.last_name),
        updated_at: Utc::now(),
        ..person.clone()
    }
}

/// Link `child` under `parent`, returning updated copies `(parent, child)`.
///
/// Appends to both lists unconditionally: the parent cap, duplicate check and
/// cycle check are preconditions the caller verifies first.
pub fn add_child_relationship(parent: &Person, child: &Person) -> (Person, Person) {
    let now = Utc::now();

    let mut updated_parent = parent.clone();
    updated_parent.children_ids.push(child.id.clone());
    updated_parent.updated_at = now;

    let mut updated_child = child.clone();
    updated_child.parent_ids.push(parent.id.clone());
    updated_child.updated_at = now;

    (updated_parent, updated_child)
}

/// Inverse of [`add_child_relationship`]. Removing a link that is not there
/// leaves both lists unchanged (timestamps are still bumped).
pub fn remove_child_relationship(parent: &Person, child: &Person) -> (Person, Person) {
    let now = Utc::now();

    let mut updated_parent = parent.clone();
    updated_parent.children_ids.retain(|id| *id != child.id);
    updated_parent.updated_at = now;

    let mut updated_child = child.clone();
    updated_child.parent_ids.retain(|id| *id != parent.id);
    updated_child.updated_at = now;

    (updated_parent, updated_child)
}

/// `true` iff `person` has at most [`MAX_PARENTS`] parents.
pub fn validate_parent_count(person: &Person) -> bool {
    person.parent_ids.len() <= MAX_PARENTS
}

/// Would making `child_id` a child of `parent_id` create a cycle?
///
/// Equivalent to asking whether `child_id` is `parent_id` itself or one of its
/// ancestors. Walks upward through `parent_ids` depth-first.
pub fn has_circular_relationship(persons: &[Person], parent_id: &str, child_id: &str) -> bool {
    let index = index_by_id(persons);
    reaches_upward(&index, parent_id, child_id)
}

/// Every person reachable downward through `children_ids`, excluding the
/// start. Breadth-first; each person appears once.
pub fn get_descendants<'a>(persons: &'a [Person], person_id: &str) -> Vec<&'a Person> {
    let index = index_by_id(persons);
    collect_reachable(&index, person_id, |p| &p.children_ids)
}

/// Every person reachable upward through `parent_ids`, excluding the start.
pub fn get_ancestors<'a>(persons: &'a [Person], person_id: &str) -> Vec<&'a Person> {
    let index = index_by_id(persons);
    collect_reachable(&index, person_id, |p| &p.parent_ids)
}

pub(crate) fn full_name_of(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

pub(crate) fn index_by_id(persons: &[Person]) -> HashMap<&str, &Person> {
    persons.iter().map(|p| (p.id.as_str(), p)).collect()
}

/// Depth-first walk from `start` through parent edges looking for `target`.
pub(crate) fn reaches_upward(index: &HashMap<&str, &Person>, start: &str, target: &str) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![start];

    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        let Some(person) = index.get(id) else {
            continue;
        };
        // Reverse so the first-listed parent is explored first.
        for parent_id in person.parent_ids.iter().rev() {
            if !visited.contains(parent_id.as_str()) {
                stack.push(parent_id.as_str());
            }
        }
    }

    false
}

fn collect_reachable<'a, F>(
    index: &HashMap<&str, &'a Person>,
    start: &str,
    edges: F,
) -> Vec<&'a Person>
where
    F: Fn(&'a Person) -> &'a Vec<String>,
{
    let mut result = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&'a Person> = VecDeque::new();

    visited.insert(start);
    if let Some(person) = index.get(start) {
        queue.push_back(*person);
    }

    while let Some(current) = queue.pop_front() {
        for next_id in edges(current) {
            let Some(next) = index.get(next_id.as_str()) else {
                continue;
            };
            if visited.insert(next.id.as_str()) {
                result.push(*next);
                queue.push_back(*next);
            }
        }
    }

    result
}
