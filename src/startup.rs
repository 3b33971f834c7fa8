use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::authentication::AuthService;
use crate::configuration::{DatabaseSettings, Settings};
use crate::errors::AuthError;
use crate::store::PgUserStore;

/// Assemble an `AuthService` backed by Postgres.
///
/// Token settings are validated here, so a missing signing secret fails
/// before the first request is served.
pub fn build(configuration: &Settings) -> Result<AuthService<PgUserStore>, AuthError> {
    // Create Postgres database connection pool
    let connection_pool = get_connection_pool(&configuration.database);

    AuthService::new(PgUserStore::new(connection_pool), &configuration.token)
}

/// Create a connection pool that only connects once a query is issued
pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}
