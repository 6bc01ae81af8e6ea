//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the catalog query pipeline, and errors live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod query;

pub use entities::{CartEntry, Catalog, Course, Level, User};
pub use errors::DomainError;
pub use query::{CategoryFilter, LevelFilter, QueryCriteria, SortKey, categories, query};
