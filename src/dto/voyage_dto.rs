use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::voyage::{NewVoyage, VoyageFilter};
use crate::models::{PostingPeriod, VoyageStatus};
use crate::services::VoyagePatch;
use crate::utils::validation::validate_not_blank;

// Request para crear un voyage (el buque viene en la ruta)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoyageRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub voy_no: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    #[validate(range(min = 2000, max = 2100))]
    pub posting_year: i32,
    #[validate(range(min = 1, max = 12))]
    pub posting_month: i32,
}

impl CreateVoyageRequest {
    pub fn into_new_voyage(self, vessel_id: Uuid) -> NewVoyage {
        NewVoyage {
            vessel_id,
            voy_no: self.voy_no.trim().to_string(),
            start_at: self.start_at,
            end_at: self.end_at,
            posting: PostingPeriod::new(self.posting_year, self.posting_month),
        }
    }
}

// Request para actualizar campos generales de un voyage
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVoyageRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub voy_no: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

impl From<UpdateVoyageRequest> for VoyagePatch {
    fn from(request: UpdateVoyageRequest) -> Self {
        Self {
            voy_no: request.voy_no.map(|voy_no| voy_no.trim().to_string()),
            start_at: request.start_at,
            end_at: request.end_at,
            active: request.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateVoyageStatusRequest {
    pub status: VoyageStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostingRequest {
    #[validate(range(min = 2000, max = 2100))]
    pub posting_year: i32,
    #[validate(range(min = 1, max = 12))]
    pub posting_month: i32,
}

impl UpdatePostingRequest {
    pub fn period(&self) -> PostingPeriod {
        PostingPeriod::new(self.posting_year, self.posting_month)
    }
}

// Query de listado por periodo contable
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListVoyagesQuery {
    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<i32>,
}

impl From<ListVoyagesQuery> for VoyageFilter {
    fn from(query: ListVoyagesQuery) -> Self {
        Self {
            year: query.year,
            month: query.month,
        }
    }
}
