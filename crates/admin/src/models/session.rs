//! Session-related types for authentication state.

use serde::{Deserialize, Serialize};

use berrystand_core::UserId;

use super::user::User;

/// Session-stored identity.
///
/// Minimal data stored in the session to identify the logged-in
/// administrator; the principal the auth gate works with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Name shown in the page header.
    pub display_name: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

/// Session keys for authentication and notice data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for one-shot flash notices.
    pub const FLASH: &str = "flash";
}
