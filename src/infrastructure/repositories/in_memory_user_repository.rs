use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, User, UserRepository};
use crate::domain::user::Username;

/// Process-local UserRepository keyed by username
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Username, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<Uuid, RepositoryError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "username {} is taken",
                user.username
            ))),
            Entry::Vacant(slot) => {
                let id = user.id;
                slot.insert(user);
                Ok(id)
            }
        }
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(username).map(|entry| entry.value().clone()))
    }
}
