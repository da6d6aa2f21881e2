//! Domain errors raised by the orchestration layer.

use thiserror::Error;

use super::validation::FieldError;
use crate::store::StoreError;

/// Every failure a person/tree operation can report to its caller.
#[derive(Debug, Error)]
pub enum FamilyError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("Person not found")]
    PersonNotFound(String),

    /// A `parentIds` entry on create points at nobody.
    #[error("Parent with ID {0} not found")]
    UnknownParent(String),

    #[error("Parent not found")]
    ParentNotFound(String),

    #[error("Child not found")]
    ChildNotFound(String),

    #[error("{0}")]
    TooManyParents(&'static str),

    #[error("Parent-child relationship already exists")]
    RelationshipExists,

    #[error("Parent-child relationship does not exist")]
    RelationshipNotExists,

    #[error("Adding this relationship would create a circular dependency")]
    CircularRelationship,

    #[error("Deletion strategy must be either \"orphan\" or \"cascade\"")]
    InvalidDeletionStrategy(String),

    #[error("Family tree already exists. Use update endpoints to modify existing tree.")]
    TreeAlreadyExists,

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl FamilyError {
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code carried in the API error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::PersonNotFound(_) => "PERSON_NOT_FOUND",
            Self::UnknownParent(_) | Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ChildNotFound(_) => "CHILD_NOT_FOUND",
            Self::TooManyParents(_) => "TOO_MANY_PARENTS",
            Self::RelationshipExists => "RELATIONSHIP_EXISTS",
            Self::RelationshipNotExists => "RELATIONSHIP_NOT_EXISTS",
            Self::CircularRelationship => "CIRCULAR_RELATIONSHIP",
            Self::InvalidDeletionStrategy(_) => "INVALID_DELETION_STRATEGY",
            Self::TreeAlreadyExists => "TREE_ALREADY_EXISTS",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, FamilyError>;
