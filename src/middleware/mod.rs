//! Middleware del sistema
//!
//! Este módulo contiene el extractor de identidad (JWT) y la capa CORS.

pub mod auth;
pub mod cors;

pub use auth::Claims;
pub use cors::cors_layer;
