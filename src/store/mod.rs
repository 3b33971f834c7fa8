mod memory;
mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

use crate::domain::{NewUser, User, UserId};
use crate::utils::error_chain_fmt;

/// Persistence seam used by `AuthService`.
///
/// Implementations own username uniqueness: `insert` must fail with
/// `StoreError::Conflict` when a user with the same username (compared
/// case-insensitively) already exists.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user whose username matches `username` ignoring case
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Persist a new user and return the identifier assigned to it
    async fn insert(&self, user: NewUser) -> Result<UserId, StoreError>;
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("A user with the same username already exists.")]
    Conflict,
    #[error("The user store is unavailable.")]
    Unavailable(#[source] anyhow::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
