use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::vessel::{NewVessel, VesselChanges};
use crate::utils::validation::validate_not_blank;

// Request para crear un buque
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVesselRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub code: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(max = 50))]
    pub vessel_type: Option<String>,
}

impl From<CreateVesselRequest> for NewVessel {
    fn from(request: CreateVesselRequest) -> Self {
        Self {
            code: request.code.trim().to_string(),
            name: request.name.trim().to_string(),
            vessel_type: request.vessel_type,
        }
    }
}

// Request para actualizar un buque
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVesselRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(max = 50))]
    pub vessel_type: Option<String>,
}

impl From<UpdateVesselRequest> for VesselChanges {
    fn from(request: UpdateVesselRequest) -> Self {
        Self {
            code: request.code.map(|code| code.trim().to_string()),
            name: request.name.map(|name| name.trim().to_string()),
            vessel_type: request.vessel_type,
        }
    }
}

// Request para asignar un usuario a un buque
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserRequest {
    pub user_id: Uuid,
}
