use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::user::Username;

/// User data for persistence
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: Username,
    pub password_hash: String,
}

/// Repository trait for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; fails with `Conflict` if the username is taken
    async fn create(&self, user: User) -> Result<Uuid, RepositoryError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError>;
}
