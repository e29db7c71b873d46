use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::config::BootstrapConfig;

/// Create the first admin account if it does not exist yet. Every other
/// account is created through the API by an existing admin or trainer, so
/// this is the only way into an empty database.
pub async fn create_initial_admin(pool: &PgPool, config: &BootstrapConfig) -> Result<()> {
    let existing = sqlx::query("SELECT 1 FROM admins WHERE email = $1")
        .bind(&config.admin_email)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&config.admin_password)
        .map_err(|e| anyhow::anyhow!("invalid bootstrap admin password: {e}"))?;

    sqlx::query(
        "INSERT INTO admins (id, email, password_hash, full_name) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(&config.admin_email)
    .bind(&password_hash)
    .bind(&config.admin_full_name)
    .execute(pool)
    .await?;

    tracing::info!("Created initial admin account {}", config.admin_email);
    Ok(())
}
