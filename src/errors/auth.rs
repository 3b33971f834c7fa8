use crate::authentication::ConfigurationError;
use crate::store::StoreError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("The username is already taken.")]
    UsernameTaken,
    // Returned both for unknown usernames and wrong passwords
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("The `{0}` setting is required but missing.")]
    ConfigurationMissing(&'static str),
    #[error("Failed to reach the user store.")]
    StoreUnavailable(#[source] StoreError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => AuthError::UsernameTaken,
            StoreError::Unavailable(_) => AuthError::StoreUnavailable(e),
        }
    }
}

impl From<ConfigurationError> for AuthError {
    fn from(e: ConfigurationError) -> Self {
        match e {
            ConfigurationError::Missing(setting) => AuthError::ConfigurationMissing(setting),
            other => AuthError::UnexpectedError(
                anyhow::Error::new(other).context("Invalid token configuration."),
            ),
        }
    }
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
