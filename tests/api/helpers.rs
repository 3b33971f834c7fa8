use expense_auth::authentication::{AuthService, Credentials};
use expense_auth::configuration::TokenSettings;
use expense_auth::domain::{NewUser, User, UserId};
use expense_auth::errors::AuthError;
use expense_auth::store::{InMemoryUserStore, StoreError, UserStore};
use expense_auth::telemetry::{get_subscriber, init_subscriber};
use fake::faker::internet::en::Username;
use fake::Fake;
use once_cell::sync::Lazy;
use secrecy::Secret;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const SIGNING_SECRET: &str =
    "integration-test-signing-secret-which-is-comfortably-over-sixty-four-bytes";

pub struct TestApp<S = InMemoryUserStore> {
    pub service: AuthService<S>,
    pub test_user: TestUser,
}

impl<S: UserStore> TestApp<S> {
    /// Register the test user and return its identifier
    pub async fn register_test_user(&self) -> UserId {
        self.service
            .register(self.test_user.credentials())
            .await
            .expect("Failed to register test user")
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        self.service.register(credentials(username, password)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.service.login(credentials(username, password)).await
    }
}

pub fn token_settings() -> TokenSettings {
    TokenSettings {
        signing_secret: Some(Secret::new(SIGNING_SECRET.to_string())),
        expiration_hours: 24,
    }
}

/// Build an `AuthService` over an empty in-memory store
pub fn spawn_app() -> TestApp {
    spawn_app_with_store(InMemoryUserStore::new())
}

pub fn spawn_app_with_store<S: UserStore>(store: S) -> TestApp<S> {
    // Setup logger
    // The code in `TRACING` is executed only the first time.
    // All other calls will skip execution.
    Lazy::force(&TRACING);

    let service =
        AuthService::new(store, &token_settings()).expect("Failed to build the auth service");

    TestApp {
        service,
        test_user: TestUser::generate(),
    }
}

pub fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: Secret::new(password.to_string()),
    }
}

pub struct TestUser {
    pub username: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        Self {
            username: Username().fake(),
            password: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        credentials(&self.username, &self.password)
    }
}

/// A store whose backend is always down
pub struct UnavailableUserStore;

#[async_trait::async_trait]
impl UserStore for UnavailableUserStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")))
    }

    async fn insert(&self, _user: NewUser) -> Result<UserId, StoreError> {
        Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")))
    }
}

/// A store that misses the existing user on lookup, as happens when two
/// registrations for the same username race, and only notices on insert
#[derive(Default)]
pub struct RacingUserStore {
    pub inner: InMemoryUserStore,
}

#[async_trait::async_trait]
impl UserStore for RacingUserStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, user: NewUser) -> Result<UserId, StoreError> {
        self.inner.insert(user).await
    }
}
