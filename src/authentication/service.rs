use anyhow::Context;
use secrecy::Secret;

use super::password::{
    hash_new_password, verify_password_hash, FALLBACK_PASSWORD_HASH, FALLBACK_PASSWORD_SALT,
};
use super::token::TokenIssuer;
use crate::configuration::TokenSettings;
use crate::domain::{NewUser, Password, UserId, Username};
use crate::errors::AuthError;
use crate::store::UserStore;

// User credentials used for registration and authentication
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

/// Registers users and exchanges their credentials for bearer tokens
#[derive(Debug)]
pub struct AuthService<S> {
    store: S,
    token_issuer: TokenIssuer,
}

impl<S: UserStore> AuthService<S> {
    /// Build the service, failing if the token settings are unusable
    pub fn new(store: S, token_settings: &TokenSettings) -> Result<Self, AuthError> {
        let token_issuer = TokenIssuer::new(token_settings)?;

        Ok(Self::from_parts(store, token_issuer))
    }

    pub fn from_parts(store: S, token_issuer: TokenIssuer) -> Self {
        Self {
            store,
            token_issuer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.token_issuer
    }

    #[tracing::instrument(name = "Check if user exists", skip(self))]
    pub async fn user_exists(&self, username: &str) -> Result<bool, AuthError> {
        let user = self
            .store
            .find_by_username(username)
            .await
            .map_err(AuthError::StoreUnavailable)?;

        Ok(user.is_some())
    }

    #[tracing::instrument(
        name = "Register a new user",
        skip(self, credentials),
        fields(
            username = %credentials.username,
            user_id = tracing::field::Empty
        )
    )]
    pub async fn register(&self, credentials: Credentials) -> Result<UserId, AuthError> {
        let username = Username::parse(credentials.username).map_err(AuthError::InvalidInput)?;
        let password = Password::parse(credentials.password).map_err(AuthError::InvalidInput)?;

        if self.user_exists(username.as_ref()).await? {
            return Err(AuthError::UsernameTaken);
        }

        let digest = hash_new_password(&password).context("Failed to hash password.")?;

        // A conflict reported by the store means a concurrent registration
        // claimed the username first
        let user_id = self
            .store
            .insert(NewUser {
                username: username.into_inner(),
                password_hash: digest.hash,
                password_salt: digest.salt,
            })
            .await?;

        // Record user id in tracing span
        tracing::Span::current().record("user_id", &tracing::field::display(&user_id));

        Ok(user_id)
    }

    #[tracing::instrument(
        name = "Log a user in",
        skip(self, credentials),
        fields(
            username = %credentials.username,
            user_id = tracing::field::Empty
        )
    )]
    pub async fn login(&self, credentials: Credentials) -> Result<String, AuthError> {
        let stored_user = self
            .store
            .find_by_username(&credentials.username)
            .await
            .map_err(AuthError::StoreUnavailable)?;

        // Fall back to a dummy digest when no user matches, so unknown
        // usernames go through the same verification work as wrong passwords
        let (expected_password_hash, password_salt) = match &stored_user {
            Some(user) => (user.password_hash.as_slice(), user.password_salt.as_slice()),
            None => (
                FALLBACK_PASSWORD_HASH.as_slice(),
                FALLBACK_PASSWORD_SALT.as_slice(),
            ),
        };

        let verification =
            verify_password_hash(expected_password_hash, password_salt, &credentials.password);

        // This is only set to `Some` if we found the user in the store.
        // So, even if the fallback digest ends up matching (somehow)
        // with the provided password, we never authenticate a non-existing user.
        let user = match (verification, stored_user) {
            (Ok(()), Some(user)) => user,
            (Ok(()), None) | (Err(AuthError::InvalidCredentials), _) => {
                tracing::info!("Rejected invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
            (Err(e), _) => return Err(e),
        };

        // Record user id in tracing span
        tracing::Span::current().record("user_id", &tracing::field::display(&user.id));

        let token = self
            .token_issuer
            .issue(&user)
            .context("Failed to issue a bearer token.")?;

        Ok(token)
    }
}
