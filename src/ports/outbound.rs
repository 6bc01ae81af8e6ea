//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Catalog, DomainError, User};

/// Catalog source. Loaded once at startup; the result is read-only.
#[async_trait::async_trait]
pub trait CatalogPort: Send + Sync {
    async fn load_catalog(&self) -> Result<Catalog, DomainError>;
}

/// Durable key-value storage local to the client.
///
/// Values are opaque strings (the cart stores a JSON array under one key).
#[async_trait::async_trait]
pub trait StoragePort: Send + Sync {
    /// Returns `None` if the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Replaces the value under `key`. Last write wins.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Deletes the key. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}

/// Opaque identity provider. Only the presence of a user is consulted by the core.
#[async_trait::async_trait]
pub trait IdentityPort: Send + Sync {
    async fn current_user(&self) -> Option<User>;

    async fn login(&self, name: &str, email: &str) -> Result<User, DomainError>;

    async fn logout(&self) -> Result<(), DomainError>;
}
