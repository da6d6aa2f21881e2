//! Genealogy record keeping over per-person JSON documents.
//!
//! Every person is stored as its own document. Parent/child links are kept
//! on both sides of the relationship (`parentIds` on the child,
//! `childrenIds` on the parent), and the relationship engine keeps the two
//! sides in step while refusing cycles and third parents.
//!
//! # Architecture
//!
//! - **Engine**: pure functions over [`family::types::Person`] records
//!   ([`family::relations`], [`family::integrity`])
//! - **Orchestration**: precondition checks and persistence order for each
//!   operation ([`family::persons`], [`family::links`], [`family::tree`])
//! - **Storage**: the [`store::PersonStore`] trait, backed by a directory of
//!   JSON files or by memory
//! - **Transport**: a JSON REST API built on axum ([`api`], [`server`])
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`family`]: domain types, relationship engine, and operations
//! - [`store`]: record store trait and backends
//! - [`api`]: HTTP router, handlers, and the response envelope
//! - [`server`]: listener setup and graceful shutdown

pub mod api;
pub mod config;
pub mod family;
pub mod server;
pub mod store;
