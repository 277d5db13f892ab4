//! Modelo de combustible por voyage: ROB de apertura/cierre y eventos de bunkering.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::activity::ActivityType;

/// Unidad fija del libro de combustible
pub const FUEL_UNIT: &str = "L";

/// ROB (Remaining On Board) de un voyage, uno a uno
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelRob {
    pub voyage_id: Uuid,
    pub opening_rob: f64,
    pub closing_rob: f64,
    pub unit: String,
}

/// Pareja de ROB expuesta en el libro; {0, 0, "L"} si aún no existe fila
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RobFigures {
    pub opening_rob: f64,
    pub closing_rob: f64,
    pub unit: String,
}

impl Default for RobFigures {
    fn default() -> Self {
        Self {
            opening_rob: 0.0,
            closing_rob: 0.0,
            unit: FUEL_UNIT.to_string(),
        }
    }
}

impl From<FuelRob> for RobFigures {
    fn from(rob: FuelRob) -> Self {
        Self {
            opening_rob: rob.opening_rob,
            closing_rob: rob.closing_rob,
            unit: rob.unit,
        }
    }
}

/// Evento de bunkering (carga de combustible)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelBunkerEvent {
    pub id: Uuid,
    pub voyage_id: Uuid,
    pub at: DateTime<Utc>,
    pub amount: f64,
    pub unit: String,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBunker {
    pub voyage_id: Uuid,
    pub at: DateTime<Utc>,
    pub amount: f64,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BunkerChanges {
    pub at: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    pub remark: Option<String>,
}

/// Consumo sumado desde las actividades activas
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFuelSummary {
    pub consumed_from_activities: f64,
    pub by_activity_type: BTreeMap<ActivityType, f64>,
}

/// Vista de solo lectura del libro de combustible de un voyage
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLedger {
    pub rob: RobFigures,
    pub bunkers: Vec<FuelBunkerEvent>,
    pub computed: ActivityFuelSummary,
}
