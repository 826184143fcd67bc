//! Seed the administrator account.
//!
//! Creates the default `admin` account when the user table is empty; the
//! same idempotent check the admin binary runs at startup.

use berrystand_admin::config::AdminConfig;
use berrystand_admin::services::auth::ensure_seed_admin;
use berrystand_admin::{db, migrator};

/// Ensure the seed administrator account exists.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or database access
/// fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    migrator().run(&pool).await?;

    if ensure_seed_admin(&pool).await? {
        tracing::info!("Administrator account created");
    } else {
        tracing::info!("Administrator account already present; nothing to do");
    }

    Ok(())
}
