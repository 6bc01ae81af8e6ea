//! Implements IdentityPort as an in-process session holder.
//!
//! No credentials are checked; the storefront only needs to know whether someone is
//! signed in.

use crate::domain::{DomainError, User};
use crate::ports::IdentityPort;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default)]
pub struct LocalIdentity {
    current: RwLock<Option<User>>,
}

impl LocalIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IdentityPort for LocalIdentity {
    async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    async fn login(&self, name: &str, email: &str) -> Result<User, DomainError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(DomainError::Auth("name is required".into()));
        }
        if !email.contains('@') {
            return Err(DomainError::Auth(format!("invalid email: {}", email)));
        }
        let user = User {
            id: email.to_lowercase(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: None,
        };
        *self.current.write().await = Some(user.clone());
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    async fn logout(&self) -> Result<(), DomainError> {
        if let Some(user) = self.current.write().await.take() {
            info!(user_id = %user.id, "signed out");
        }
        Ok(())
    }
}
