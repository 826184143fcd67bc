//! Berry Stand Admin - catalog administration web application.
//!
//! Library crate backing the `berrystand-admin` binary; also used by the
//! CLI (migrations, seeding) and the integration tests.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - `SQLite` (via sqlx) for users and products
//! - tower-sessions for login state
//! - Local filesystem storage for uploaded product images

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

/// Embedded database migrations for the admin store.
#[must_use]
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}
