pub mod error;
pub mod integrity;
pub mod links;
pub mod persons;
pub mod relations;
pub mod tree;
pub mod types;
pub mod validation;
