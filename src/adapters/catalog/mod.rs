//! CatalogPort implementations.

pub mod catalog_json;

pub use catalog_json::CatalogJson;
