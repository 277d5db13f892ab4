use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::fuel::BunkerChanges;
use crate::services::BunkerDraft;

// Request para actualizar el ROB; al menos uno de los dos valores
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_rob_present"))]
pub struct UpdateRobRequest {
    #[validate(range(min = 0.0))]
    pub opening_rob: Option<f64>,
    #[validate(range(min = 0.0))]
    pub closing_rob: Option<f64>,
}

fn validate_rob_present(request: &UpdateRobRequest) -> Result<(), ValidationError> {
    if request.opening_rob.is_none() && request.closing_rob.is_none() {
        let mut error = ValidationError::new("required");
        error.message = Some("openingRob or closingRob is required".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBunkerRequest {
    pub at: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

impl From<CreateBunkerRequest> for BunkerDraft {
    fn from(request: CreateBunkerRequest) -> Self {
        Self {
            at: request.at,
            amount: request.amount,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_bunker_change"))]
pub struct UpdateBunkerRequest {
    pub at: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

fn validate_bunker_change(request: &UpdateBunkerRequest) -> Result<(), ValidationError> {
    if request.at.is_none() && request.amount.is_none() && request.remark.is_none() {
        let mut error = ValidationError::new("required");
        error.message = Some("At least one field is required".into());
        return Err(error);
    }
    Ok(())
}

impl From<UpdateBunkerRequest> for BunkerChanges {
    fn from(request: UpdateBunkerRequest) -> Self {
        Self {
            at: request.at,
            amount: request.amount,
            remark: request.remark,
        }
    }
}
