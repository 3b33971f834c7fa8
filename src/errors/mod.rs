mod auth;

pub use auth::AuthError;
