//! Authentication service: credential checks and first-run seeding.
//!
//! Passwords are stored as Argon2id PHC strings and never in plaintext.
//! Verification goes through `argon2`'s constant-time machinery, and an
//! unknown username burns an equal-cost hash so the two failure modes are
//! indistinguishable from outside.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Username of the account seeded on first run.
pub const SEED_USERNAME: &str = "admin";

/// Password of the account seeded on first run.
pub const SEED_PASSWORD: &str = "admin123";

const SEED_DISPLAY_NAME: &str = "Store administrator";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username unknown or password wrong; callers can't tell which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    Hashing(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Hash a password into an Argon2id PHC string.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Look up a user by username and verify the password.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on any mismatch; unknown
/// usernames take the same hashing cost as wrong passwords.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let users = UserRepository::new(pool);

    match users.get_by_username(username).await? {
        Some(user) => {
            let parsed = PasswordHash::new(&user.password_hash)
                .map_err(|e| AuthError::Hashing(e.to_string()))?;

            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .map_err(|_| AuthError::InvalidCredentials)?;

            Ok(user)
        }
        None => {
            // Burn an equal-cost hash so a missing user is not faster to
            // probe than a wrong password.
            let salt = SaltString::generate(&mut OsRng);
            let _ = Argon2::default().hash_password(password.as_bytes(), &salt);

            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Create the seed administrator account if no user exists yet.
///
/// One-time idempotent check run at process startup (and by
/// `berry-cli seed`).
///
/// # Errors
///
/// Returns `AuthError::Repository` if the check or insert fails.
pub async fn ensure_seed_admin(pool: &SqlitePool) -> Result<bool, AuthError> {
    let users = UserRepository::new(pool);

    if users.count().await? > 0 {
        return Ok(false);
    }

    let password_hash = hash_password(SEED_PASSWORD)?;

    match users
        .create(SEED_USERNAME, &password_hash, SEED_DISPLAY_NAME)
        .await
    {
        Ok(user) => {
            tracing::info!(username = %user.username, "seeded administrator account");
            Ok(true)
        }
        // Another process seeded between the count and the insert.
        Err(RepositoryError::Conflict(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
