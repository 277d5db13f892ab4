//! DTOs de la API
//!
//! Formas de request (con derives de `validator`) y respuestas genéricas.
//! Las reglas que dependen de datos almacenados viven en los servicios.

pub mod activity_dto;
pub mod common_dto;
pub mod consumption_dto;
pub mod fuel_dto;
pub mod vessel_dto;
pub mod voyage_dto;

pub use common_dto::ApiResponse;
