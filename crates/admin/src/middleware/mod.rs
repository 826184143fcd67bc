//! Middleware and extractors for the admin application.

pub mod auth;
pub mod flash;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use flash::{FlashLevel, FlashMessage, push_flash, take_flash};
pub use session::create_session_layer;
