use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::RepositoryError;
use crate::user::errors::UniqueField;

/// Process-local user store.
///
/// Uniqueness checks and the insert happen under one write lock, so two
/// concurrent registrations for the same email cannot both succeed.
/// Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        // A username clash is reported ahead of an email clash.
        if users.values().any(|existing| existing.username == user.username) {
            return Err(RepositoryError::Duplicate(UniqueField::Username));
        }
        if users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Duplicate(UniqueField::Email));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;

        Ok(users
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }
}
