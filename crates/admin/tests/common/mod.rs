//! Shared fixtures for service-level tests.
//!
//! Each test gets its own in-memory database (single connection, so every
//! query sees the same store) and a throwaway upload directory.

#![allow(dead_code)]

use axum::body::Bytes;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use berrystand_admin::migrator;
use berrystand_admin::services::{ImageStore, ImageUpload};

/// Fresh in-memory database with migrations applied.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory database");

    migrator().run(&pool).await.expect("run migrations");

    pool
}

/// Image store rooted in a unique temp directory.
pub async fn test_images() -> ImageStore {
    let dir = std::env::temp_dir().join(format!("berrystand-test-{}", Uuid::new_v4()));
    let store = ImageStore::new(dir);
    store.ensure_dir().await.expect("create upload dir");
    store
}

/// A small fake image upload with the given client filename.
pub fn upload(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: Some(name.to_string()),
        bytes: Bytes::from_static(b"fake image bytes"),
    }
}

/// Number of files currently in the store's upload directory.
pub fn stored_file_count(store: &ImageStore) -> usize {
    std::fs::read_dir(store.upload_dir())
        .map(|entries| entries.count())
        .unwrap_or(0)
}
