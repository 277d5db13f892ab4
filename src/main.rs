use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use voyage_ledger::build_router;
use voyage_ledger::config::{DatabaseConfig, EnvironmentConfig};
use voyage_ledger::database::connect_and_migrate;
use voyage_ledger::repositories::{FleetStore, MemoryRepository, PgRepository};
use voyage_ledger::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚢 Voyage Ledger API");

    let config = EnvironmentConfig::from_env()?;

    // Almacén: PostgreSQL si hay DATABASE_URL, memoria en caso contrario
    let store: Arc<dyn FleetStore> = match &config.database_url {
        Some(url) => {
            let pool = connect_and_migrate(&DatabaseConfig::new(url.clone())).await?;
            info!("✅ Base de datos conectada y migrada");
            Arc::new(PgRepository::new(pool))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando almacén en memoria");
            Arc::new(MemoryRepository::new())
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let environment = config.environment.clone();
    let app = build_router(AppState::new(config, store));

    info!("🌐 Servidor iniciando en http://{} ({})", addr, environment);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
