use anyhow::Context;
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};
use sha2::Sha512;

use crate::domain::Password;
use crate::errors::AuthError;

type HmacSha512 = Hmac<Sha512>;

/// Length of the per-user HMAC key, the block size of SHA-512
pub const SALT_LENGTH: usize = 128;

/// Length of an HMAC-SHA-512 digest
pub const HASH_LENGTH: usize = 64;

// Compared against when the username is unknown, so that both login paths
// compute a digest before failing
pub(crate) static FALLBACK_PASSWORD_SALT: [u8; SALT_LENGTH] = [0; SALT_LENGTH];
pub(crate) static FALLBACK_PASSWORD_HASH: [u8; HASH_LENGTH] = [0; HASH_LENGTH];

/// A password digest together with the key it was computed with
#[derive(Debug, Clone)]
pub struct PasswordDigest {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

/// Generate a fresh random HMAC key
pub fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Compute `HMAC-SHA-512(salt, password)` over the UTF-8 bytes of the password
pub fn compute_password_hash(salt: &[u8], password: &str) -> Result<Vec<u8>, anyhow::Error> {
    let mut mac = HmacSha512::new_from_slice(salt).context("Failed to build an HMAC context.")?;
    mac.update(password.as_bytes());

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Hash a new password under a freshly generated salt
#[tracing::instrument(name = "Hash new password", skip(password))]
pub fn hash_new_password(password: &Password) -> Result<PasswordDigest, anyhow::Error> {
    let salt = generate_salt();
    let hash = compute_password_hash(&salt, password.expose_secret())?;

    Ok(PasswordDigest { hash, salt })
}

#[tracing::instrument(
    name = "Verify password hash",
    skip(expected_password_hash, password_salt, password_candidate)
)]
pub fn verify_password_hash(
    expected_password_hash: &[u8],
    password_salt: &[u8],
    password_candidate: &Secret<String>,
) -> Result<(), AuthError> {
    let mut mac = HmacSha512::new_from_slice(password_salt)
        .context("Failed to build an HMAC context.")
        .map_err(AuthError::UnexpectedError)?;
    mac.update(password_candidate.expose_secret().as_bytes());

    mac.verify_slice(expected_password_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
