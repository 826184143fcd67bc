//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! berry-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `SQLite` connection string (default: sqlite:berrystand.db)

use berrystand_admin::config::AdminConfig;
use berrystand_admin::{db, migrator};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the database cannot be
/// opened, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    migrator().run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
