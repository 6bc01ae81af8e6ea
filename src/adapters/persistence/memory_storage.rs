//! Implements StoragePort in memory. Used by tests and for sessions without a data dir.

use crate::domain::DomainError;
use crate::ports::StoragePort;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let s = MemoryStorage::new();
        assert_eq!(s.get("cart").await.unwrap(), None);
        s.set("cart", "[]").await.unwrap();
        s.set("cart", "[1]").await.unwrap();
        assert_eq!(s.get("cart").await.unwrap().as_deref(), Some("[1]"));
        s.remove("cart").await.unwrap();
        s.remove("cart").await.unwrap();
        assert_eq!(s.get("cart").await.unwrap(), None);
    }
}
