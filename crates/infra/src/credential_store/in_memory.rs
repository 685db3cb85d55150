use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use estate_auth::{NewUser, User};
use estate_core::UserId;

use super::r#trait::CredentialStore;
use crate::store::StoreError;

/// In-memory user store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("credential store lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;

        // Check and insert under one write lock so concurrent registrations of
        // the same email cannot both succeed.
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email '{}'", user.email)));
        }

        let created = User {
            id: UserId::new(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".to_string()))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<User, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".to_string()))
    }
}
