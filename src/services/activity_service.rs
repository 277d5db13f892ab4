use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::access::{AccessResolver, VoyageGate};
use crate::models::activity::{ActivityRevision, NewActivity};
use crate::models::{Activity, ActivityFields, ActivitySegment, ActivityType, Actor};
use crate::repositories::FleetStore;
use crate::utils::errors::{not_found_error, validation_error, AppResult};

/// Alta de actividad en forma plana, aún sin validar contra su tipo
#[derive(Debug, Clone)]
pub struct ActivityDraft {
    pub kind: ActivityType,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub fields: ActivityFields,
}

/// PATCH de actividad; `kind` solo se acepta si coincide con el almacenado
#[derive(Debug, Clone, Default)]
pub struct ActivityPatch {
    pub kind: Option<ActivityType>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub fields: ActivityFields,
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn FleetStore>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    fn access(&self) -> AccessResolver<'_> {
        AccessResolver::new(self.store.as_ref())
    }

    pub async fn list(&self, actor: &Actor, voyage_id: Uuid) -> AppResult<Vec<Activity>> {
        self.access().voyage(actor, voyage_id, VoyageGate::Any).await?;
        self.store.list_activities(voyage_id).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> AppResult<Activity> {
        let (activity, _) = self.access().activity(actor, id, VoyageGate::Any).await?;
        Ok(activity)
    }

    pub async fn create(&self, actor: &Actor, voyage_id: Uuid, draft: ActivityDraft) -> AppResult<Activity> {
        self.access().voyage(actor, voyage_id, VoyageGate::RequireOpen).await?;

        let segment = ActivitySegment::validate(draft.kind, draft.start_at, draft.end_at, &draft.fields)?;
        let created = self
            .store
            .insert_activity(NewActivity {
                voyage_id,
                segment,
                created_by_id: actor.id,
            })
            .await?;

        tracing::info!(
            activity_id = %created.id,
            %voyage_id,
            activity_type = %created.kind(),
            "Activity created"
        );
        Ok(created)
    }

    /// Mezcla el patch sobre lo almacenado y revalida contra el tipo existente
    pub async fn update(&self, actor: &Actor, id: Uuid, patch: ActivityPatch) -> AppResult<Activity> {
        let (current, _) = self.access().activity(actor, id, VoyageGate::RequireOpen).await?;
        let kind = current.kind();

        if patch.kind.is_some_and(|requested| requested != kind) {
            return Err(validation_error("type", "Changing activity type is not allowed"));
        }

        let merged = current.details.fields().overlay(patch.fields);
        let segment = ActivitySegment::validate(
            kind,
            patch.start_at.unwrap_or(current.start_at),
            patch.end_at.unwrap_or(current.end_at),
            &merged,
        )?;

        self.store
            .update_activity(
                id,
                ActivityRevision {
                    segment,
                    active: patch.active,
                },
            )
            .await?
            .ok_or_else(|| not_found_error("Activity"))
    }

    /// Baja lógica; los consumos de la actividad no se tocan
    pub async fn remove(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        self.access().activity(actor, id, VoyageGate::RequireOpen).await?;

        if !self.store.set_activity_active(id, false).await? {
            return Err(not_found_error("Activity"));
        }
        tracing::info!(activity_id = %id, "Activity deactivated");
        Ok(())
    }
}
