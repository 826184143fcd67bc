//! Administrator account domain type.

use berrystand_core::UserId;

/// An administrator account.
///
/// Exactly one is seeded on first run; accounts are never deleted by the
/// application and the password is only ever stored hashed.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC-format password hash.
    pub password_hash: String,
    /// Name shown in the page header.
    pub display_name: String,
}
