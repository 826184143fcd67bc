//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET  /                                  - Catalog listing (paginated)
//! GET  /product/add                       - Add-product form
//! POST /product/add                       - Create product (multipart)
//! POST /product/{id}/add-to-basket        - Move product into the basket
//! POST /product/{id}/return-to-catalog    - Move product back to the catalog
//! POST /product/{id}/delete               - Delete product and its image
//!
//! # Basket
//! GET  /basket                            - Basket listing with total
//! POST /basket/checkout                   - Clear the basket
//!
//! # Auth
//! GET  /login                             - Login form
//! POST /login                             - Verify credentials
//! POST /logout                            - Logout
//! ```
//!
//! Uploaded images are served from `/media` and css from `/static`, both
//! wired up as `ServeDir` services in `main`.

pub mod auth;
pub mod basket;
pub mod catalog;

use axum::Router;

use crate::middleware::flash::FlashMessage;
use crate::models::{CurrentUser, Product};
use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(catalog::router())
        .merge(basket::router())
}

// =============================================================================
// Shared template view models
// =============================================================================

/// Logged-in user view for the page header.
#[derive(Debug, Clone)]
pub struct UserView {
    pub display_name: String,
}

impl From<&CurrentUser> for UserView {
    fn from(user: &CurrentUser) -> Self {
        Self {
            display_name: user.display_name.clone(),
        }
    }
}

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub added_on: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image_url: format!("/media/{}", product.image_filename),
            added_on: product.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Flash notice view for the base template.
#[derive(Debug, Clone)]
pub struct FlashView {
    pub level_class: String,
    pub message: String,
}

impl From<FlashMessage> for FlashView {
    fn from(flash: FlashMessage) -> Self {
        Self {
            level_class: flash.level.css_class().to_string(),
            message: flash.message,
        }
    }
}

/// Resolve where a POST action should bounce back to.
///
/// Only same-site absolute paths are accepted; anything else falls back to
/// the given default.
#[must_use]
pub fn redirect_target(requested: Option<&str>, fallback: &str) -> String {
    match requested {
        Some(target) if target.starts_with('/') && !target.starts_with("//") => {
            target.trim_end_matches('?').to_string()
        }
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_target_accepts_local_paths() {
        assert_eq!(redirect_target(Some("/basket"), "/"), "/basket");
        assert_eq!(redirect_target(Some("/?page=2"), "/"), "/?page=2");
    }

    #[test]
    fn test_redirect_target_rejects_offsite() {
        assert_eq!(redirect_target(Some("https://evil.test"), "/"), "/");
        assert_eq!(redirect_target(Some("//evil.test"), "/"), "/");
        assert_eq!(redirect_target(None, "/basket"), "/basket");
    }

    #[test]
    fn test_redirect_target_trims_dangling_query() {
        assert_eq!(redirect_target(Some("/basket?"), "/"), "/basket");
    }
}
