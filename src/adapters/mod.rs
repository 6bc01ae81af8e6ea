//! Infrastructure adapters. Implement ports.
//!
//! Catalog file, cart storage, identity, terminal UI. Map errors to DomainError.

pub mod catalog;
pub mod identity;
pub mod persistence;
pub mod ui;
