pub mod activity_routes;
pub mod consumption_routes;
pub mod fuel_routes;
pub mod health_routes;
pub mod vessel_routes;
pub mod voyage_routes;

use axum::Router;

use crate::state::AppState;

/// Rutas de la API, montadas bajo `/api`
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(vessel_routes::create_vessel_router())
        .merge(voyage_routes::create_voyage_router())
        .merge(activity_routes::create_activity_router())
        .merge(consumption_routes::create_consumption_router())
        .merge(fuel_routes::create_fuel_router())
}
