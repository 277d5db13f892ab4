//! Voyage Ledger
//!
//! Backend de registro operativo de buques: voyages con ciclo OPEN/CLOSED,
//! actividades por tipo, consumos validados contra la política de cada tipo
//! y reconciliación de combustible (ROB + bunkers).

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Construye el router completo con sus capas
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .nest("/api", routes::create_api_router())
        .merge(routes::health_routes::create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
