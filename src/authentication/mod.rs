mod password;
mod service;
mod token;

pub use password::{
    compute_password_hash, generate_salt, hash_new_password, verify_password_hash,
    PasswordDigest, HASH_LENGTH, SALT_LENGTH,
};
pub use service::{AuthService, Credentials};
pub use token::{
    Claims, ConfigurationError, TokenError, TokenIssuer, MIN_SIGNING_SECRET_BYTES,
};
