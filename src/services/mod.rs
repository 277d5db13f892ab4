//! Services module
//!
//! Este módulo contiene la lógica de negocio: resolución de acceso, máquina
//! de estados del voyage, actividades, política de consumos y libro de
//! combustible. Los servicios solo hablan con el almacén vía `FleetStore`.

pub mod access;
pub mod activity_service;
pub mod consumption_policy;
pub mod consumption_service;
pub mod fuel_service;
pub mod vessel_service;
pub mod voyage_service;

pub use activity_service::{ActivityDraft, ActivityPatch, ActivityService};
pub use consumption_service::{ConsumptionDraft, ConsumptionService};
pub use fuel_service::{BunkerDraft, FuelService};
pub use vessel_service::VesselService;
pub use voyage_service::{VoyagePatch, VoyageService};
