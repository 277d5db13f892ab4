//! Máquina de estados del voyage
//!
//! OPEN es el estado inicial y CLOSED el terminal. El cierre exige que cada
//! actividad activa tenga sus consumos obligatorios; si falta alguno se
//! devuelve la lista completa y no se cierra nada.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::access::{AccessResolver, VoyageGate};
use super::consumption_policy::close_shortfalls;
use crate::models::voyage::{NewVoyage, VoyageChanges, VoyageDetail, VoyageFilter};
use crate::models::{Actor, PostingPeriod, VesselSummary, Voyage, VoyageStatus};
use crate::repositories::FleetStore;
use crate::utils::errors::{invalid_state_error, not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::ensure_time_order;

/// Cambios generales; el estado y el periodo contable tienen sus propias operaciones
#[derive(Debug, Clone, Default)]
pub struct VoyagePatch {
    pub voy_no: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

/// Un EMPLOYEE solo puede imputar el voyage al mes de su inicio o de su fin
pub fn employee_posting_allowed(
    posting: PostingPeriod,
    start_at: DateTime<Utc>,
    end_at: Option<DateTime<Utc>>,
) -> bool {
    posting == PostingPeriod::of(start_at) || end_at.map_or(false, |end| posting == PostingPeriod::of(end))
}

#[derive(Clone)]
pub struct VoyageService {
    store: Arc<dyn FleetStore>,
}

impl VoyageService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    fn access(&self) -> AccessResolver<'_> {
        AccessResolver::new(self.store.as_ref())
    }

    pub async fn list_by_vessel(&self, actor: &Actor, vessel_id: Uuid, filter: VoyageFilter) -> AppResult<Vec<Voyage>> {
        self.access().vessel(actor, vessel_id).await?;
        self.store.list_voyages(vessel_id, &filter).await
    }

    pub async fn create(&self, actor: &Actor, voyage: NewVoyage) -> AppResult<Voyage> {
        self.access().vessel(actor, voyage.vessel_id).await?;

        if let Some(end_at) = voyage.end_at {
            ensure_time_order(voyage.start_at, end_at)?;
        }
        if !actor.role.is_privileged() && !employee_posting_allowed(voyage.posting, voyage.start_at, voyage.end_at) {
            return Err(validation_error(
                "postingMonth",
                "Posting period must match the month of startAt or endAt",
            ));
        }

        let created = self.store.insert_voyage(voyage).await?;
        tracing::info!(
            voyage_id = %created.id,
            vessel_id = %created.vessel_id,
            voy_no = %created.voy_no,
            "Voyage created"
        );
        Ok(created)
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> AppResult<VoyageDetail> {
        let voyage = self.access().voyage(actor, id, VoyageGate::Any).await?;
        let vessel = self
            .store
            .find_vessel(voyage.vessel_id, &actor.scope())
            .await?
            .ok_or_else(|| not_found_error("Voyage"))?;

        Ok(VoyageDetail {
            vessel: VesselSummary::from(&vessel),
            voyage,
        })
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, patch: VoyagePatch) -> AppResult<Voyage> {
        actor.require_privileged("update voyage")?;
        let current = self.access().voyage(actor, id, VoyageGate::Any).await?;

        let start_at = patch.start_at.unwrap_or(current.start_at);
        if let Some(end_at) = patch.end_at.or(current.end_at) {
            ensure_time_order(start_at, end_at)?;
        }

        let changes = VoyageChanges {
            voy_no: patch.voy_no,
            start_at: patch.start_at,
            end_at: patch.end_at,
            active: patch.active,
            ..Default::default()
        };
        self.apply(id, changes).await
    }

    /// Solo existe OPEN -> CLOSED; repetir el estado actual es un error
    pub async fn update_status(&self, actor: &Actor, id: Uuid, status: VoyageStatus) -> AppResult<Voyage> {
        let current = self.access().voyage(actor, id, VoyageGate::Any).await?;

        if current.status == status {
            return Err(invalid_state_error("Voyage status is already set"));
        }
        if status == VoyageStatus::Open {
            return Err(invalid_state_error("A CLOSED voyage cannot be reopened"));
        }

        let closed = match self.store.close_voyage(id, close_shortfalls).await {
            Ok(Some(voyage)) => voyage,
            Ok(None) => return Err(not_found_error("Voyage")),
            Err(AppError::IncompleteForClose(shortfalls)) => {
                tracing::warn!(
                    voyage_id = %id,
                    incomplete_activities = shortfalls.len(),
                    "Voyage close rejected"
                );
                return Err(AppError::IncompleteForClose(shortfalls));
            }
            Err(e) => return Err(e),
        };
        tracing::info!(voyage_id = %id, "Voyage closed");
        Ok(closed)
    }

    pub async fn update_posting(&self, actor: &Actor, id: Uuid, posting: PostingPeriod) -> AppResult<Voyage> {
        actor.require_privileged("update voyage posting")?;
        let current = self.access().voyage(actor, id, VoyageGate::Any).await?;

        if current.posting() == posting {
            return Err(invalid_state_error("Posting period is already set"));
        }
        self.apply(
            id,
            VoyageChanges {
                posting: Some(posting),
                ..Default::default()
            },
        )
        .await
    }

    /// Borrado físico; falla con DependencyExists si el voyage tiene hijos
    pub async fn remove(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        actor.require_privileged("delete voyage")?;
        self.access().voyage(actor, id, VoyageGate::Any).await?;

        self.store.delete_voyage(id).await?;
        tracing::info!(voyage_id = %id, "Voyage deleted");
        Ok(())
    }

    async fn apply(&self, id: Uuid, changes: VoyageChanges) -> AppResult<Voyage> {
        self.store
            .update_voyage(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Voyage"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_employee_posting_matches_start_or_end_month() {
        let start = Utc.with_ymd_and_hms(2025, 1, 30, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 2, 2, 0, 0, 0).unwrap();

        assert!(employee_posting_allowed(PostingPeriod::new(2025, 1), start, Some(end)));
        assert!(employee_posting_allowed(PostingPeriod::new(2025, 2), start, Some(end)));
        assert!(!employee_posting_allowed(PostingPeriod::new(2025, 3), start, Some(end)));
        assert!(!employee_posting_allowed(PostingPeriod::new(2025, 2), start, None));
        assert!(!employee_posting_allowed(PostingPeriod::new(2024, 1), start, None));
    }
}
