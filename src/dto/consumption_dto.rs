use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::consumption::ConsumptionChanges;
use crate::models::{ConsumptionCategory, ConsumptionScope, ConsumptionSource, ConsumptionUnit};
use crate::services::ConsumptionDraft;
use crate::utils::validation::validate_not_blank;

// Request para crear un consumo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_water_scope", skip_on_field_errors = false))]
pub struct CreateConsumptionRequest {
    pub category: ConsumptionCategory,
    pub scope: ConsumptionScope,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub item_name: String,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    pub unit: ConsumptionUnit,
    pub source: Option<ConsumptionSource>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

/// WATER no se registra contra motores ni reefers
fn validate_water_scope(request: &CreateConsumptionRequest) -> Result<(), ValidationError> {
    let engine_scope = matches!(
        request.scope,
        ConsumptionScope::MainEngine | ConsumptionScope::Generator | ConsumptionScope::Reefer
    );
    if request.category == ConsumptionCategory::Water && engine_scope {
        let mut error = ValidationError::new("water_scope");
        error.message = Some("WATER should usually use scope AUXILIARY or OTHER".into());
        return Err(error);
    }
    Ok(())
}

impl From<CreateConsumptionRequest> for ConsumptionDraft {
    fn from(request: CreateConsumptionRequest) -> Self {
        Self {
            category: request.category,
            scope: request.scope,
            item_name: request.item_name.trim().to_string(),
            quantity: request.quantity,
            unit: request.unit,
            source: request.source,
            remark: request.remark,
        }
    }
}

// Request para actualizar un consumo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateConsumptionRequest {
    pub category: Option<ConsumptionCategory>,
    pub scope: Option<ConsumptionScope>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub item_name: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    pub unit: Option<ConsumptionUnit>,
    pub source: Option<ConsumptionSource>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateConsumptionRequest> for ConsumptionChanges {
    fn from(request: UpdateConsumptionRequest) -> Self {
        Self {
            category: request.category,
            scope: request.scope,
            item_name: request.item_name.map(|name| name.trim().to_string()),
            quantity: request.quantity,
            unit: request.unit,
            source: request.source,
            remark: request.remark,
            active: request.active,
        }
    }
}
