//! Modelo de Vessel
//!
//! Buques de la flota y sus asignaciones usuario <-> buque.
//! Ambos se desactivan con `active = false`, nunca se borran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vessel principal - mapea a la tabla vessels
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub vessel_type: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Resumen que acompaña al detalle de un voyage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

impl From<&Vessel> for VesselSummary {
    fn from(vessel: &Vessel) -> Self {
        Self {
            id: vessel.id,
            code: vessel.code.clone(),
            name: vessel.name.clone(),
        }
    }
}

/// Vínculo usuario <-> buque; único por (user_id, vessel_id)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VesselAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vessel_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVessel {
    pub code: String,
    pub name: String,
    pub vessel_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VesselChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub vessel_type: Option<String>,
}
