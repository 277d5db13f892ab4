//! Modelo de Consumption
//!
//! Líneas de consumo (combustible, lubricante, agua, otros) colgadas de una
//! actividad. Qué combinaciones (category, scope) se admiten lo decide la
//! política del tipo de actividad, ver `services::consumption_policy`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::activity::ActivityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "consumption_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionCategory {
    Fuel,
    Lube,
    Water,
    Other,
}

impl ConsumptionCategory {
    pub const ALL: [ConsumptionCategory; 4] = [
        ConsumptionCategory::Fuel,
        ConsumptionCategory::Lube,
        ConsumptionCategory::Water,
        ConsumptionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumptionCategory::Fuel => "FUEL",
            ConsumptionCategory::Lube => "LUBE",
            ConsumptionCategory::Water => "WATER",
            ConsumptionCategory::Other => "OTHER",
        }
    }
}

/// Sistema de a bordo que consume el recurso
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "consumption_scope", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionScope {
    MainEngine,
    Generator,
    Reefer,
    Auxiliary,
    Other,
}

impl ConsumptionScope {
    pub const ALL: [ConsumptionScope; 5] = [
        ConsumptionScope::MainEngine,
        ConsumptionScope::Generator,
        ConsumptionScope::Reefer,
        ConsumptionScope::Auxiliary,
        ConsumptionScope::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumptionScope::MainEngine => "MAIN_ENGINE",
            ConsumptionScope::Generator => "GENERATOR",
            ConsumptionScope::Reefer => "REEFER",
            ConsumptionScope::Auxiliary => "AUXILIARY",
            ConsumptionScope::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "consumption_unit", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionUnit {
    Liter,
    Kg,
    Ton,
    Kwh,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[sqlx(type_name = "consumption_source", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionSource {
    #[default]
    Manual,
    Calculated,
}

/// Par (category, scope) sobre el que se expresa la política
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsumptionKey {
    pub category: ConsumptionCategory,
    pub scope: ConsumptionScope,
}

impl ConsumptionKey {
    pub const fn new(category: ConsumptionCategory, scope: ConsumptionScope) -> Self {
        Self { category, scope }
    }
}

impl std::fmt::Display for ConsumptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category.as_str(), self.scope.as_str())
    }
}

/// Consumption principal - mapea a la tabla consumptions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Consumption {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub category: ConsumptionCategory,
    pub scope: ConsumptionScope,
    pub item_name: String,
    pub quantity: f64,
    pub unit: ConsumptionUnit,
    pub source: ConsumptionSource,
    pub remark: Option<String>,
    pub active: bool,
    pub created_by_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Consumption {
    pub fn key(&self) -> ConsumptionKey {
        ConsumptionKey::new(self.category, self.scope)
    }
}

#[derive(Debug, Clone)]
pub struct NewConsumption {
    pub activity_id: Uuid,
    pub category: ConsumptionCategory,
    pub scope: ConsumptionScope,
    pub item_name: String,
    pub quantity: f64,
    pub unit: ConsumptionUnit,
    pub source: ConsumptionSource,
    pub remark: Option<String>,
    pub created_by_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ConsumptionChanges {
    pub category: Option<ConsumptionCategory>,
    pub scope: Option<ConsumptionScope>,
    pub item_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<ConsumptionUnit>,
    pub source: Option<ConsumptionSource>,
    pub remark: Option<String>,
    pub active: Option<bool>,
}

/// Actividad a la que le faltan consumos obligatorios
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingRequired {
    pub activity_id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub missing: Vec<ConsumptionKey>,
}

/// Resultado de crear un consumo: el registro y lo que aún falta
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionCreated {
    pub created: Consumption,
    pub missing_required: Vec<ConsumptionKey>,
}
