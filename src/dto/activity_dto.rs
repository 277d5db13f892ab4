use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::{ActivityFields, ActivityType};
use crate::services::{ActivityDraft, ActivityPatch};

// Request para crear una actividad; los campos por tipo van en plano
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(flatten)]
    #[validate]
    pub fields: ActivityFields,
}

impl From<CreateActivityRequest> for ActivityDraft {
    fn from(request: CreateActivityRequest) -> Self {
        Self {
            kind: request.kind,
            start_at: request.start_at,
            end_at: request.end_at,
            fields: request.fields,
        }
    }
}

// Request para actualizar una actividad; `type` es opcional y no puede cambiar
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[serde(rename = "type")]
    pub kind: Option<ActivityType>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub active: Option<bool>,
    #[serde(flatten)]
    #[validate]
    pub fields: ActivityFields,
}

impl From<UpdateActivityRequest> for ActivityPatch {
    fn from(request: UpdateActivityRequest) -> Self {
        Self {
            kind: request.kind,
            start_at: request.start_at,
            end_at: request.end_at,
            fields: request.fields,
            active: request.active,
        }
    }
}
