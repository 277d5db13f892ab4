//! Modelo de Activity
//!
//! Cada actividad es un segmento de tiempo dentro de un voyage. Hay seis
//! tipos y cada uno lleva solo los campos que le aplican: el tipo es la
//! variante de `ActivityDetails`, no una columna más.
//!
//! Los requests y las filas de base de datos usan la forma plana
//! (`ActivityFields`); `ActivitySegment::validate` es el único camino de la
//! forma plana a la tipada.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

use super::voyage::PostingPeriod;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::{
    ensure_max_chars, ensure_non_negative, ensure_not_blank, ensure_positive, ensure_time_order,
};

pub const REMARK_MAX_CHARS: usize = 500;

/// Tipo de actividad - mapea al ENUM activity_type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type,
)]
#[sqlx(type_name = "activity_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    CargoLoad,
    CargoDischarge,
    Manoeuvring,
    Anchoring,
    FullSpeedAway,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 6] = [
        ActivityType::CargoLoad,
        ActivityType::CargoDischarge,
        ActivityType::Manoeuvring,
        ActivityType::Anchoring,
        ActivityType::FullSpeedAway,
        ActivityType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::CargoLoad => "CARGO_LOAD",
            ActivityType::CargoDischarge => "CARGO_DISCHARGE",
            ActivityType::Manoeuvring => "MANOEUVRING",
            ActivityType::Anchoring => "ANCHORING",
            ActivityType::FullSpeedAway => "FULL_SPEED_AWAY",
            ActivityType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forma plana de los campos opcionales/por tipo.
///
/// Los rangos del derive son la validación de forma del request; las reglas
/// por tipo las aplica `ActivityDetails::build`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFields {
    #[validate(range(min = 1))]
    pub container_count: Option<i32>,
    #[validate(range(min = 0.0))]
    pub total_container_weight: Option<f64>,
    #[validate(range(min = 0))]
    pub reefer_count: Option<i32>,
    #[validate(range(min = 1))]
    pub main_engine_count: Option<i32>,
    #[validate(range(min = 0.0))]
    pub main_engine_hours: Option<f64>,
    #[validate(range(min = 1))]
    pub generator_count: Option<i32>,
    #[validate(range(min = 0.0))]
    pub generator_hours: Option<f64>,
    #[validate(range(min = 0.0))]
    pub fuel_used: Option<f64>,
    #[validate(range(min = 0.0))]
    pub avg_speed: Option<f64>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

impl ActivityFields {
    /// Merge de PATCH: el campo del patch gana si viene, si no se conserva el existente
    pub fn overlay(self, patch: ActivityFields) -> Self {
        Self {
            container_count: patch.container_count.or(self.container_count),
            total_container_weight: patch.total_container_weight.or(self.total_container_weight),
            reefer_count: patch.reefer_count.or(self.reefer_count),
            main_engine_count: patch.main_engine_count.or(self.main_engine_count),
            main_engine_hours: patch.main_engine_hours.or(self.main_engine_hours),
            generator_count: patch.generator_count.or(self.generator_count),
            generator_hours: patch.generator_hours.or(self.generator_hours),
            fuel_used: patch.fuel_used.or(self.fuel_used),
            avg_speed: patch.avg_speed.or(self.avg_speed),
            remark: patch.remark.or(self.remark),
        }
    }
}

/// Registro de máquinas común a todos los tipos salvo OTHER
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reefer_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_engine_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_engine_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl EngineLog {
    fn build(fields: &ActivityFields) -> AppResult<Self> {
        if let Some(count) = fields.reefer_count {
            ensure_non_negative("reeferCount", count)?;
        }
        if let Some(count) = fields.main_engine_count {
            ensure_positive("mainEngineCount", count)?;
        }
        if let Some(hours) = fields.main_engine_hours {
            ensure_non_negative("mainEngineHours", hours)?;
        }
        if let Some(count) = fields.generator_count {
            ensure_positive("generatorCount", count)?;
        }
        if let Some(hours) = fields.generator_hours {
            ensure_non_negative("generatorHours", hours)?;
        }
        if let Some(fuel) = fields.fuel_used {
            ensure_non_negative("fuelUsed", fuel)?;
        }
        if let Some(remark) = &fields.remark {
            ensure_max_chars("remark", remark, REMARK_MAX_CHARS)?;
        }

        Ok(Self {
            reefer_count: fields.reefer_count,
            main_engine_count: fields.main_engine_count,
            main_engine_hours: fields.main_engine_hours,
            generator_count: fields.generator_count,
            generator_hours: fields.generator_hours,
            fuel_used: fields.fuel_used,
            remark: fields.remark.clone(),
        })
    }

    fn write_into(&self, fields: &mut ActivityFields) {
        fields.reefer_count = self.reefer_count;
        fields.main_engine_count = self.main_engine_count;
        fields.main_engine_hours = self.main_engine_hours;
        fields.generator_count = self.generator_count;
        fields.generator_hours = self.generator_hours;
        fields.fuel_used = self.fuel_used;
        fields.remark = self.remark.clone();
    }
}

/// Carga/descarga de contenedores
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoFigures {
    pub container_count: i32,
    pub total_container_weight: f64,
    #[serde(flatten)]
    pub engine: EngineLog,
}

impl CargoFigures {
    fn build(fields: &ActivityFields) -> AppResult<Self> {
        let container_count = fields
            .container_count
            .ok_or_else(|| validation_error("containerCount", "containerCount is required"))?;
        ensure_positive("containerCount", container_count)?;

        let total_container_weight = fields.total_container_weight.ok_or_else(|| {
            validation_error("totalContainerWeight", "totalContainerWeight is required")
        })?;
        ensure_non_negative("totalContainerWeight", total_container_weight)?;

        Ok(Self {
            container_count,
            total_container_weight,
            engine: EngineLog::build(fields)?,
        })
    }
}

/// Navegación a toda máquina
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedFigures {
    pub avg_speed: f64,
    #[serde(flatten)]
    pub engine: EngineLog,
}

impl SpeedFigures {
    fn build(fields: &ActivityFields) -> AppResult<Self> {
        let avg_speed = fields
            .avg_speed
            .ok_or_else(|| validation_error("avgSpeed", "avgSpeed is required"))?;
        ensure_positive("avgSpeed", avg_speed)?;

        Ok(Self {
            avg_speed,
            engine: EngineLog::build(fields)?,
        })
    }
}

/// Datos específicos de cada tipo de actividad
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityDetails {
    CargoLoad(CargoFigures),
    CargoDischarge(CargoFigures),
    Manoeuvring(EngineLog),
    Anchoring(EngineLog),
    FullSpeedAway(SpeedFigures),
    /// Sin campos numéricos; la descripción es obligatoria
    Other { remark: String },
}

impl ActivityDetails {
    /// Valida la forma plana contra el esquema del tipo indicado
    pub fn build(kind: ActivityType, fields: &ActivityFields) -> AppResult<Self> {
        reject_foreign_fields(kind, fields)?;

        let details = match kind {
            ActivityType::CargoLoad => Self::CargoLoad(CargoFigures::build(fields)?),
            ActivityType::CargoDischarge => Self::CargoDischarge(CargoFigures::build(fields)?),
            ActivityType::Manoeuvring => Self::Manoeuvring(EngineLog::build(fields)?),
            ActivityType::Anchoring => Self::Anchoring(EngineLog::build(fields)?),
            ActivityType::FullSpeedAway => Self::FullSpeedAway(SpeedFigures::build(fields)?),
            ActivityType::Other => {
                let remark = fields
                    .remark
                    .clone()
                    .ok_or_else(|| validation_error("remark", "remark is required for OTHER"))?;
                ensure_not_blank("remark", &remark)?;
                ensure_max_chars("remark", &remark, REMARK_MAX_CHARS)?;
                Self::Other { remark }
            }
        };
        Ok(details)
    }

    pub fn kind(&self) -> ActivityType {
        match self {
            Self::CargoLoad(_) => ActivityType::CargoLoad,
            Self::CargoDischarge(_) => ActivityType::CargoDischarge,
            Self::Manoeuvring(_) => ActivityType::Manoeuvring,
            Self::Anchoring(_) => ActivityType::Anchoring,
            Self::FullSpeedAway(_) => ActivityType::FullSpeedAway,
            Self::Other { .. } => ActivityType::Other,
        }
    }

    pub fn engine(&self) -> Option<&EngineLog> {
        match self {
            Self::CargoLoad(cargo) | Self::CargoDischarge(cargo) => Some(&cargo.engine),
            Self::Manoeuvring(engine) | Self::Anchoring(engine) => Some(engine),
            Self::FullSpeedAway(speed) => Some(&speed.engine),
            Self::Other { .. } => None,
        }
    }

    pub fn fuel_used(&self) -> Option<f64> {
        self.engine().and_then(|engine| engine.fuel_used)
    }

    /// Vuelta a la forma plana (para merge y persistencia)
    pub fn fields(&self) -> ActivityFields {
        let mut fields = ActivityFields::default();
        match self {
            Self::CargoLoad(cargo) | Self::CargoDischarge(cargo) => {
                fields.container_count = Some(cargo.container_count);
                fields.total_container_weight = Some(cargo.total_container_weight);
                cargo.engine.write_into(&mut fields);
            }
            Self::Manoeuvring(engine) | Self::Anchoring(engine) => engine.write_into(&mut fields),
            Self::FullSpeedAway(speed) => {
                fields.avg_speed = Some(speed.avg_speed);
                speed.engine.write_into(&mut fields);
            }
            Self::Other { remark } => fields.remark = Some(remark.clone()),
        }
        fields
    }
}

/// Campos de otro tipo son error, salvo en OTHER donde los números se ignoran
fn reject_foreign_fields(kind: ActivityType, fields: &ActivityFields) -> AppResult<()> {
    let cargo = [
        ("containerCount", fields.container_count.is_some()),
        ("totalContainerWeight", fields.total_container_weight.is_some()),
    ];
    let speed = [("avgSpeed", fields.avg_speed.is_some())];

    let foreign: Vec<(&'static str, bool)> = match kind {
        ActivityType::CargoLoad | ActivityType::CargoDischarge => speed.to_vec(),
        ActivityType::Manoeuvring | ActivityType::Anchoring => {
            cargo.iter().chain(speed.iter()).copied().collect()
        }
        ActivityType::FullSpeedAway => cargo.to_vec(),
        ActivityType::Other => Vec::new(),
    };

    match foreign.into_iter().find(|(_, present)| *present) {
        Some((field, _)) => Err(validation_error(
            field,
            format!("{} is not allowed for {}", field, kind),
        )),
        None => Ok(()),
    }
}

/// Segmento validado: intervalo + datos del tipo
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySegment {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub details: ActivityDetails,
}

impl ActivitySegment {
    pub fn validate(
        kind: ActivityType,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        fields: &ActivityFields,
    ) -> AppResult<Self> {
        let details = ActivityDetails::build(kind, fields)?;
        ensure_time_order(start_at, end_at)?;

        // Las horas ya pasaron por EngineLog::build; se repite sobre el resultado final
        if let Some(engine) = details.engine() {
            if let Some(hours) = engine.main_engine_hours {
                ensure_non_negative("mainEngineHours", hours)?;
            }
            if let Some(hours) = engine.generator_hours {
                ensure_non_negative("generatorHours", hours)?;
            }
        }

        Ok(Self {
            start_at,
            end_at,
            details,
        })
    }

    /// year/month desnormalizados a partir de startAt (UTC)
    pub fn period(&self) -> PostingPeriod {
        PostingPeriod::of(self.start_at)
    }
}

/// Activity almacenada
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub voyage_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub year: i32,
    pub month: i32,
    #[serde(flatten)]
    pub details: ActivityDetails,
    pub active: bool,
    pub created_by_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn kind(&self) -> ActivityType {
        self.details.kind()
    }
}

/// Fila plana de la tabla activities
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: Uuid,
    pub voyage_id: Uuid,
    pub activity_type: ActivityType,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub year: i32,
    pub month: i32,
    pub container_count: Option<i32>,
    pub total_container_weight: Option<f64>,
    pub reefer_count: Option<i32>,
    pub main_engine_count: Option<i32>,
    pub main_engine_hours: Option<f64>,
    pub generator_count: Option<i32>,
    pub generator_hours: Option<f64>,
    pub fuel_used: Option<f64>,
    pub avg_speed: Option<f64>,
    pub remark: Option<String>,
    pub active: bool,
    pub created_by_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let fields = ActivityFields {
            container_count: row.container_count,
            total_container_weight: row.total_container_weight,
            reefer_count: row.reefer_count,
            main_engine_count: row.main_engine_count,
            main_engine_hours: row.main_engine_hours,
            generator_count: row.generator_count,
            generator_hours: row.generator_hours,
            fuel_used: row.fuel_used,
            avg_speed: row.avg_speed,
            remark: row.remark,
        };
        let details = ActivityDetails::build(row.activity_type, &fields).map_err(|e| {
            AppError::Internal(format!("stored activity {} does not match its type: {}", row.id, e))
        })?;

        Ok(Self {
            id: row.id,
            voyage_id: row.voyage_id,
            start_at: row.start_at,
            end_at: row.end_at,
            year: row.year,
            month: row.month,
            details,
            active: row.active,
            created_by_id: row.created_by_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub voyage_id: Uuid,
    pub segment: ActivitySegment,
    pub created_by_id: Uuid,
}

/// Reemplazo completo del segmento tras el merge de un PATCH
#[derive(Debug, Clone)]
pub struct ActivityRevision {
    pub segment: ActivitySegment,
    pub active: Option<bool>,
}
