//! Resolución de acceso sobre la cadena vessel -> voyage -> activity -> consumption.
//!
//! Un registro fuera del alcance del actor es indistinguible de uno que no
//! existe: ambos terminan en NotFound con el mismo mensaje.

use uuid::Uuid;

use crate::models::{Activity, Actor, Consumption, Vessel, Voyage};
use crate::repositories::FleetStore;
use crate::utils::errors::{invalid_state_error, not_found_error, AppError, AppResult};

/// Requisito sobre el estado del voyage padre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoyageGate {
    Any,
    RequireOpen,
}

/// InvalidState si el voyage está CLOSED
pub fn ensure_open(voyage: &Voyage) -> AppResult<()> {
    if voyage.is_open() {
        Ok(())
    } else {
        Err(invalid_state_error("Voyage is CLOSED"))
    }
}

pub struct AccessResolver<'a> {
    store: &'a dyn FleetStore,
}

impl<'a> AccessResolver<'a> {
    pub fn new(store: &'a dyn FleetStore) -> Self {
        Self { store }
    }

    pub async fn vessel(&self, actor: &Actor, id: Uuid) -> AppResult<Vessel> {
        self.store
            .find_vessel(id, &actor.scope())
            .await?
            .ok_or_else(|| not_found_error("Vessel"))
    }

    pub async fn voyage(&self, actor: &Actor, id: Uuid, gate: VoyageGate) -> AppResult<Voyage> {
        let voyage = self
            .store
            .find_voyage(id, &actor.scope())
            .await?
            .ok_or_else(|| not_found_error("Voyage"))?;

        if gate == VoyageGate::RequireOpen {
            ensure_open(&voyage)?;
        }
        Ok(voyage)
    }

    /// Actividad visible junto con su voyage
    pub async fn activity(&self, actor: &Actor, id: Uuid, gate: VoyageGate) -> AppResult<(Activity, Voyage)> {
        let activity = self
            .store
            .find_activity(id, &actor.scope())
            .await?
            .ok_or_else(|| not_found_error("Activity"))?;

        let voyage = self
            .voyage(actor, activity.voyage_id, gate)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => not_found_error("Activity"),
                other => other,
            })?;
        Ok((activity, voyage))
    }

    pub async fn consumption(
        &self,
        actor: &Actor,
        id: Uuid,
        gate: VoyageGate,
    ) -> AppResult<(Consumption, Activity, Voyage)> {
        let consumption = self
            .store
            .find_consumption(id, &actor.scope())
            .await?
            .ok_or_else(|| not_found_error("Consumption"))?;

        let (activity, voyage) = self
            .activity(actor, consumption.activity_id, gate)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => not_found_error("Consumption"),
                other => other,
            })?;
        Ok((consumption, activity, voyage))
    }
}
