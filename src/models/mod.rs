//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio que mapean al schema
//! PostgreSQL (ver `migrations/`).

pub mod activity;
pub mod consumption;
pub mod fuel;
pub mod user;
pub mod vessel;
pub mod voyage;

pub use activity::{Activity, ActivityDetails, ActivityFields, ActivitySegment, ActivityType};
pub use consumption::{
    Consumption, ConsumptionCategory, ConsumptionKey, ConsumptionScope, ConsumptionSource,
    ConsumptionUnit, MissingRequired,
};
pub use fuel::{FuelBunkerEvent, FuelLedger, FuelRob};
pub use user::{AccessScope, Actor, Role};
pub use vessel::{Vessel, VesselAssignment, VesselSummary};
pub use voyage::{PostingPeriod, Voyage, VoyageStatus};
