//! Service-level tests for authentication and first-run seeding.

#![allow(clippy::unwrap_used)]

mod common;

use berrystand_admin::db::UserRepository;
use berrystand_admin::services::auth::{
    AuthError, SEED_PASSWORD, SEED_USERNAME, authenticate, ensure_seed_admin,
};

use common::test_pool;

#[tokio::test]
async fn seed_admin_is_idempotent() {
    let pool = test_pool().await;

    assert!(ensure_seed_admin(&pool).await.unwrap());
    assert!(!ensure_seed_admin(&pool).await.unwrap());

    let users = UserRepository::new(&pool);
    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn seed_password_is_stored_hashed() {
    let pool = test_pool().await;
    ensure_seed_admin(&pool).await.unwrap();

    let users = UserRepository::new(&pool);
    let admin = users.get_by_username(SEED_USERNAME).await.unwrap().unwrap();

    assert_ne!(admin.password_hash, SEED_PASSWORD);
    assert!(admin.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn authenticate_accepts_seed_credentials() {
    let pool = test_pool().await;
    ensure_seed_admin(&pool).await.unwrap();

    let user = authenticate(&pool, SEED_USERNAME, SEED_PASSWORD).await.unwrap();
    assert_eq!(user.username, SEED_USERNAME);
}

#[tokio::test]
async fn authenticate_rejects_wrong_password() {
    let pool = test_pool().await;
    ensure_seed_admin(&pool).await.unwrap();

    let err = authenticate(&pool, SEED_USERNAME, "wrong-password").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn unknown_username_fails_the_same_way() {
    let pool = test_pool().await;
    ensure_seed_admin(&pool).await.unwrap();

    let err = authenticate(&pool, "nobody", SEED_PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn duplicate_usernames_conflict() {
    let pool = test_pool().await;
    let users = UserRepository::new(&pool);

    users.create("admin", "$argon2-fake", "First").await.unwrap();
    let err = users.create("admin", "$argon2-fake", "Second").await.unwrap_err();

    assert!(matches!(
        err,
        berrystand_admin::db::RepositoryError::Conflict(_)
    ));
}
