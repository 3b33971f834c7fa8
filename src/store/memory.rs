use std::sync::Mutex;

use super::{StoreError, UserStore};
use crate::domain::{NewUser, User, UserId};

/// A `UserStore` kept in process memory.
///
/// Identifiers are handed out sequentially starting from 1.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> Result<usize, StoreError> {
        self.lock().map(|users| users.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, StoreError> {
        self.users
            .lock()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("The user list lock was poisoned.")))
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    #[tracing::instrument(name = "Find user in memory", skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.lock()?;
        let username = username.to_lowercase();

        Ok(users
            .iter()
            .find(|user| user.username.to_lowercase() == username)
            .cloned())
    }

    #[tracing::instrument(name = "Insert user in memory", skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: NewUser) -> Result<UserId, StoreError> {
        let mut users = self.lock()?;
        let username = user.username.to_lowercase();

        if users
            .iter()
            .any(|existing| existing.username.to_lowercase() == username)
        {
            return Err(StoreError::Conflict);
        }

        let id = UserId::new(users.len() as i64 + 1);
        users.push(user.into_user(id));

        Ok(id)
    }
}
