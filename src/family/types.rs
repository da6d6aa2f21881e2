//! Core record definitions.
//!
//! Defines [`Person`] (the only graph entity), the input shapes used to create
//! and edit one ([`NewPerson`], [`PersonUpdate`]), the [`FamilyTree`] metadata
//! wrapper, and the [`DeletionStrategy`] applied when a person is removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A genealogical record, stored as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// UUID string, stable for the record's lifetime.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Always `first_name + " " + last_name`.
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    /// At most two entries once validated.
    #[serde(default)]
    pub parent_ids: Vec<String>,
    /// In the order the relationships were established.
    #[serde(default)]
    pub children_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn has_parent(&self, id: &str) -> bool {
        self.parent_ids.iter().any(|p| p == id)
    }

    pub fn has_child(&self, id: &str) -> bool {
        self.children_ids.iter().any(|c| c == id)
    }
}

/// Payload for creating a person. Unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub parent_ids: Vec<String>,
    #[serde(default)]
    pub spouse_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPerson {
    /// Convenience constructor for a name-only record.
    pub fn named(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn with_parents<I, S>(mut self, parent_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_ids = parent_ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Attribute edits for an existing person. Relationship fields are not
/// editable here; unknown fields (including `parentIds`) are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PersonUpdate {
    /// `true` if either name component is being changed.
    pub fn touches_name(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some()
    }

    /// Overlay the present fields onto `person`. Timestamps and `full_name`
    /// are left to the caller.
    pub fn apply_to(self, person: &mut Person) {
        if let Some(v) = self.first_name {
            person.first_name = v;
        }
        if let Some(v) = self.last_name {
            person.last_name = v;
        }
        if let Some(v) = self.email {
            person.email = Some(v);
        }
        if let Some(v) = self.date_of_birth {
            person.date_of_birth = Some(v);
        }
        if let Some(v) = self.place_of_birth {
            person.place_of_birth = Some(v);
        }
        if let Some(v) = self.phone_number {
            person.phone_number = Some(v);
        }
        if let Some(v) = self.profile_photo {
            person.profile_photo = Some(v);
        }
        if let Some(v) = self.notes {
            person.notes = Some(v);
        }
    }
}

/// Metadata wrapper around the whole dataset. `persons` is denormalized and
/// refreshed from the store whenever the tree is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTree {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub root_person_ids: Vec<String>,
    #[serde(default)]
    pub persons: Vec<Person>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What happens to a person's children when that person is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStrategy {
    /// Unlink the children, keep their records.
    #[default]
    Orphan,
    /// Delete every reachable descendant as well.
    Cascade,
}

impl DeletionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orphan => "orphan",
            Self::Cascade => "cascade",
        }
    }
}

impl std::fmt::Display for DeletionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeletionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orphan" => Ok(Self::Orphan),
            "cascade" => Ok(Self::Cascade),
            _ => Err(format!("unknown deletion strategy: {s}")),
        }
    }
}
