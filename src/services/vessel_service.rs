use std::sync::Arc;

use uuid::Uuid;

use super::access::AccessResolver;
use crate::models::vessel::{NewVessel, VesselChanges};
use crate::models::{AccessScope, Actor, Role, Vessel, VesselAssignment};
use crate::repositories::FleetStore;
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Gestión de buques y asignaciones
#[derive(Clone)]
pub struct VesselService {
    store: Arc<dyn FleetStore>,
}

impl VesselService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<Vessel>> {
        self.store.list_vessels(&actor.scope()).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> AppResult<Vessel> {
        AccessResolver::new(self.store.as_ref()).vessel(actor, id).await
    }

    pub async fn create(&self, actor: &Actor, vessel: NewVessel) -> AppResult<Vessel> {
        actor.require_privileged("create vessel")?;

        let created = self.store.insert_vessel(vessel).await?;
        tracing::info!(vessel_id = %created.id, code = %created.code, "Vessel created");
        Ok(created)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, changes: VesselChanges) -> AppResult<Vessel> {
        actor.require_privileged("update vessel")?;

        self.store
            .update_vessel(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Vessel"))
    }

    /// Baja lógica, solo ADMIN
    pub async fn remove(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        actor.require_role(&[Role::Admin], "delete vessel")?;

        if !self.store.deactivate_vessel(id).await? {
            return Err(not_found_error("Vessel"));
        }
        tracing::info!(vessel_id = %id, "Vessel deactivated");
        Ok(())
    }

    /// Reactiva una asignación inactiva o crea una nueva
    pub async fn assign(&self, actor: &Actor, vessel_id: Uuid, user_id: Uuid) -> AppResult<VesselAssignment> {
        actor.require_privileged("assign vessel")?;
        self.ensure_vessel(vessel_id).await?;

        if let Some(existing) = self.store.find_assignment(user_id, vessel_id).await? {
            if existing.active {
                return Err(AppError::Conflict(
                    "User is already assigned to this vessel".to_string(),
                ));
            }
        }

        let assignment = self.store.save_assignment(user_id, vessel_id, true).await?;
        tracing::info!(%vessel_id, %user_id, "Vessel assigned");
        Ok(assignment)
    }

    pub async fn unassign(&self, actor: &Actor, vessel_id: Uuid, user_id: Uuid) -> AppResult<VesselAssignment> {
        actor.require_privileged("unassign vessel")?;

        match self.store.find_assignment(user_id, vessel_id).await? {
            Some(existing) if existing.active => {
                let assignment = self.store.save_assignment(user_id, vessel_id, false).await?;
                tracing::info!(%vessel_id, %user_id, "Vessel unassigned");
                Ok(assignment)
            }
            _ => Err(not_found_error("Assignment")),
        }
    }

    pub async fn assignments(&self, actor: &Actor, vessel_id: Uuid) -> AppResult<Vec<VesselAssignment>> {
        actor.require_privileged("list vessel assignments")?;
        self.ensure_vessel(vessel_id).await?;
        self.store.list_assignments(vessel_id).await
    }

    /// Buques asignados al propio actor, sea cual sea su rol
    pub async fn my_vessels(&self, actor: &Actor) -> AppResult<Vec<Vessel>> {
        self.store.list_vessels(&AccessScope::Assigned(actor.id)).await
    }

    async fn ensure_vessel(&self, vessel_id: Uuid) -> AppResult<Vessel> {
        self.store
            .find_vessel(vessel_id, &AccessScope::Fleet)
            .await?
            .ok_or_else(|| not_found_error("Vessel"))
    }
}
