use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::configuration::TokenSettings;
use crate::domain::{User, UserId};
use crate::utils::error_chain_fmt;

/// HS512 keys shorter than the digest size are refused
pub const MIN_SIGNING_SECRET_BYTES: usize = 64;

/// Claims carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub username: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::MalformedSubject)
    }
}

#[derive(thiserror::Error)]
pub enum ConfigurationError {
    #[error("The `{0}` setting is missing.")]
    Missing(&'static str),
    #[error("The token signing secret must be at least {min_bytes} bytes long.")]
    WeakSigningSecret { min_bytes: usize },
    #[error("The `{0}` setting has an invalid value.")]
    InvalidValue(&'static str),
}

impl std::fmt::Debug for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum TokenError {
    #[error("Failed to sign the token.")]
    Encoding(#[source] jsonwebtoken::errors::Error),
    #[error("The token is invalid.")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("The token has expired.")]
    Expired,
    #[error("The token subject is not a user id.")]
    MalformedSubject,
}

impl std::fmt::Debug for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Signs and verifies HS512 bearer tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    time_to_live: Duration,
}

impl TokenIssuer {
    pub fn new(settings: &TokenSettings) -> Result<Self, ConfigurationError> {
        let secret = settings
            .signing_secret
            .as_ref()
            .map(|secret| secret.expose_secret().as_bytes())
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigurationError::Missing("token.signing_secret"))?;

        if secret.len() < MIN_SIGNING_SECRET_BYTES {
            return Err(ConfigurationError::WeakSigningSecret {
                min_bytes: MIN_SIGNING_SECRET_BYTES,
            });
        }

        if settings.expiration_hours <= 0 {
            return Err(ConfigurationError::InvalidValue("token.expiration_hours"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            time_to_live: Duration::hours(settings.expiration_hours),
        })
    }

    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// Issue a token for `user` that expires one time-to-live from now
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    #[tracing::instrument(name = "Issue token", skip(self, user), fields(user_id = %user.id))]
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.time_to_live).timestamp(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Verify the signature and expiry of `token` against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    #[tracing::instrument(name = "Verify token", skip(self, token))]
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        // Expiry is checked below against `now`, without leeway
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(TokenError::Invalid)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        claims.user_id()?;

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("time_to_live", &self.time_to_live)
            .finish_non_exhaustive()
    }
}
