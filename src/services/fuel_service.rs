//! Libro de combustible por voyage
//!
//! Vista informativa: ROB de apertura/cierre, bunkerings y el combustible
//! declarado en las actividades. No se cuadra closing contra
//! opening + bunkers - consumo.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::access::{AccessResolver, VoyageGate};
use crate::models::fuel::{ActivityFuelSummary, BunkerChanges, NewBunker, RobFigures};
use crate::models::{Activity, Actor, FuelBunkerEvent, FuelLedger, FuelRob};
use crate::repositories::FleetStore;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{ensure_non_negative, ensure_positive};

/// Suma `fuel_used` de las actividades activas, total y por tipo
pub fn summarize_activity_fuel(activities: &[Activity]) -> ActivityFuelSummary {
    activities
        .iter()
        .filter(|a| a.active)
        .fold(ActivityFuelSummary::default(), |mut summary, activity| {
            let fuel = activity.details.fuel_used().unwrap_or(0.0);
            summary.consumed_from_activities += fuel;
            *summary.by_activity_type.entry(activity.kind()).or_insert(0.0) += fuel;
            summary
        })
}

#[derive(Debug, Clone)]
pub struct BunkerDraft {
    pub at: DateTime<Utc>,
    pub amount: f64,
    pub remark: Option<String>,
}

#[derive(Clone)]
pub struct FuelService {
    store: Arc<dyn FleetStore>,
}

impl FuelService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    fn access(&self) -> AccessResolver<'_> {
        AccessResolver::new(self.store.as_ref())
    }

    pub async fn ledger(&self, actor: &Actor, voyage_id: Uuid) -> AppResult<FuelLedger> {
        self.access().voyage(actor, voyage_id, VoyageGate::Any).await?;

        let (rob, bunkers, activities) = futures::try_join!(
            self.store.find_fuel_rob(voyage_id),
            self.store.list_bunkers(voyage_id),
            self.store.list_activities(voyage_id)
        )?;

        Ok(FuelLedger {
            rob: rob.map(RobFigures::from).unwrap_or_default(),
            bunkers,
            computed: summarize_activity_fuel(&activities),
        })
    }

    pub async fn upsert_rob(
        &self,
        actor: &Actor,
        voyage_id: Uuid,
        opening_rob: Option<f64>,
        closing_rob: Option<f64>,
    ) -> AppResult<FuelRob> {
        self.access().voyage(actor, voyage_id, VoyageGate::Any).await?;

        if let Some(opening) = opening_rob {
            ensure_non_negative("openingRob", opening)?;
        }
        if let Some(closing) = closing_rob {
            ensure_non_negative("closingRob", closing)?;
        }

        let rob = self.store.upsert_fuel_rob(voyage_id, opening_rob, closing_rob).await?;
        tracing::info!(%voyage_id, opening = rob.opening_rob, closing = rob.closing_rob, "Fuel ROB saved");
        Ok(rob)
    }

    pub async fn create_bunker(&self, actor: &Actor, voyage_id: Uuid, draft: BunkerDraft) -> AppResult<FuelBunkerEvent> {
        self.access().voyage(actor, voyage_id, VoyageGate::Any).await?;
        ensure_positive("amount", draft.amount)?;

        let bunker = self
            .store
            .insert_bunker(NewBunker {
                voyage_id,
                at: draft.at,
                amount: draft.amount,
                remark: draft.remark,
            })
            .await?;
        tracing::info!(bunker_id = %bunker.id, %voyage_id, amount = bunker.amount, "Bunker event recorded");
        Ok(bunker)
    }

    pub async fn update_bunker(&self, actor: &Actor, id: Uuid, changes: BunkerChanges) -> AppResult<FuelBunkerEvent> {
        self.visible_bunker(actor, id).await?;
        if let Some(amount) = changes.amount {
            ensure_positive("amount", amount)?;
        }

        self.store
            .update_bunker(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Bunker event"))
    }

    /// Borrado físico
    pub async fn delete_bunker(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        self.visible_bunker(actor, id).await?;

        if !self.store.delete_bunker(id).await? {
            return Err(not_found_error("Bunker event"));
        }
        tracing::info!(bunker_id = %id, "Bunker event deleted");
        Ok(())
    }

    async fn visible_bunker(&self, actor: &Actor, id: Uuid) -> AppResult<FuelBunkerEvent> {
        let bunker = self
            .store
            .find_bunker(id)
            .await?
            .ok_or_else(|| not_found_error("Bunker event"))?;

        self.access()
            .voyage(actor, bunker.voyage_id, VoyageGate::Any)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => not_found_error("Bunker event"),
                other => other,
            })?;
        Ok(bunker)
    }
}
