//! Conexión a PostgreSQL y migraciones

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Abre el pool y aplica las migraciones de `migrations/`
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<PgPool> {
    tracing::info!("Conectando a {}", mask_database_url(&config.url));

    let pool = config
        .create_pool()
        .await
        .context("Could not connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Could not run database migrations")?;

    tracing::info!("Migraciones aplicadas");
    Ok(pool)
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    match url.find("://") {
        Some(scheme_end) if scheme_end < at_pos => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
