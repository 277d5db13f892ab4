//! Modelo de Voyage
//!
//! Un voyage pertenece a un buque, nace OPEN y pasa a CLOSED cuando todas sus
//! actividades cumplen la política de consumos. El periodo contable
//! (posting) es independiente de las fechas reales de navegación.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::vessel::VesselSummary;

/// Estado del voyage - mapea al ENUM voyage_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "voyage_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoyageStatus {
    Open,
    Closed,
}

impl VoyageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoyageStatus::Open => "OPEN",
            VoyageStatus::Closed => "CLOSED",
        }
    }
}

/// Voyage principal - mapea a la tabla voyages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Voyage {
    pub id: Uuid,
    pub vessel_id: Uuid,
    pub voy_no: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: VoyageStatus,
    pub posting_year: i32,
    pub posting_month: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Voyage {
    pub fn is_open(&self) -> bool {
        self.status == VoyageStatus::Open
    }

    pub fn posting(&self) -> PostingPeriod {
        PostingPeriod::new(self.posting_year, self.posting_month)
    }
}

/// Voyage con el resumen del buque, para el detalle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoyageDetail {
    #[serde(flatten)]
    pub voyage: Voyage,
    pub vessel: VesselSummary,
}

/// Periodo contable año/mes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingPeriod {
    pub year: i32,
    pub month: i32,
}

impl PostingPeriod {
    pub fn new(year: i32, month: i32) -> Self {
        Self { year, month }
    }

    /// Año/mes calendario UTC de un instante
    pub fn of(at: DateTime<Utc>) -> Self {
        Self::new(at.year(), at.month() as i32)
    }
}

#[derive(Debug, Clone)]
pub struct NewVoyage {
    pub vessel_id: Uuid,
    pub voy_no: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub posting: PostingPeriod,
}

/// Cambios parciales; `None` conserva el valor almacenado
#[derive(Debug, Clone, Default)]
pub struct VoyageChanges {
    pub voy_no: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: Option<VoyageStatus>,
    pub posting: Option<PostingPeriod>,
    pub active: Option<bool>,
}

/// Filtro de listado por periodo contable
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VoyageFilter {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

impl VoyageFilter {
    pub fn matches(&self, voyage: &Voyage) -> bool {
        self.year.map_or(true, |y| voyage.posting_year == y)
            && self.month.map_or(true, |m| voyage.posting_month == m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_posting_period_uses_utc_calendar() {
        let at = Utc.with_ymd_and_hms(2025, 1, 31, 23, 30, 0).unwrap();
        assert_eq!(PostingPeriod::of(at), PostingPeriod::new(2025, 1));
    }
}
