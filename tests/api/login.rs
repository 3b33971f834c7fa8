use chrono::{Duration, Utc};
use expense_auth::authentication::TokenError;
use expense_auth::errors::AuthError;

use crate::helpers::{spawn_app, spawn_app_with_store, UnavailableUserStore};

#[tokio::test]
async fn login_with_correct_password_returns_a_valid_token() {
    // Arrange
    let app = spawn_app();
    let user_id = app.register_test_user().await;

    // Act
    let token = app
        .login(&app.test_user.username, &app.test_user.password)
        .await
        .unwrap();

    // Assert
    let claims = app.service.token_issuer().verify(&token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.username, app.test_user.username);
}

#[tokio::test]
async fn login_ignores_username_case() {
    // Arrange
    let app = spawn_app();
    let user_id = app.register("Alice", "wonderland").await.unwrap();

    // Act
    let token = app.login("ALICE", "wonderland").await.unwrap();

    // Assert
    let claims = app.service.token_issuer().verify(&token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);
    // The stored casing is what ends up in the token
    assert_eq!(claims.username, "Alice");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    // Arrange
    let app = spawn_app();
    app.register_test_user().await;

    // Act
    let wrong_password = app
        .login(&app.test_user.username, "definitely-not-the-password")
        .await;
    let unknown_user = app.login("nobody-by-this-name", &app.test_user.password).await;

    // Assert
    let wrong_password = wrong_password.unwrap_err();
    let unknown_user = unknown_user.unwrap_err();
    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn login_fails_before_any_user_is_registered() {
    // Arrange
    let app = spawn_app();

    // Act
    let result = app.login("", "").await;

    // Assert
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn issued_tokens_expire_after_a_day() {
    // Arrange
    let app = spawn_app();
    app.register_test_user().await;
    let before_login = Utc::now();

    // Act
    let token = app
        .login(&app.test_user.username, &app.test_user.password)
        .await
        .unwrap();

    // Assert
    let issuer = app.service.token_issuer();
    let claims = issuer.verify(&token).unwrap();
    assert_eq!(claims.exp - claims.iat, Duration::hours(24).num_seconds());

    let issued_at = before_login.timestamp();
    assert!(claims.iat >= issued_at);

    let almost_a_day_later = before_login + Duration::hours(23) + Duration::minutes(59);
    assert!(issuer.verify_at(&token, almost_a_day_later).is_ok());

    let just_over_a_day_later = Utc::now() + Duration::hours(24) + Duration::minutes(1);
    assert!(matches!(
        issuer.verify_at(&token, just_over_a_day_later),
        Err(TokenError::Expired)
    ));
}

#[tokio::test]
async fn store_failures_are_propagated_on_login() {
    // Arrange
    let app = spawn_app_with_store(UnavailableUserStore);

    // Act
    let result = app.login("Alice", "password").await;

    // Assert
    assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
}
