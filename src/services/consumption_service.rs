use std::sync::Arc;

use uuid::Uuid;

use super::access::{AccessResolver, VoyageGate};
use super::consumption_policy::{compute_missing_required, enforce_policy, policy_for};
use crate::models::consumption::{ConsumptionChanges, ConsumptionCreated, NewConsumption};
use crate::models::{
    Actor, Consumption, ConsumptionCategory, ConsumptionKey, ConsumptionScope, ConsumptionSource,
    ConsumptionUnit,
};
use crate::repositories::FleetStore;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::ensure_positive;

#[derive(Debug, Clone)]
pub struct ConsumptionDraft {
    pub category: ConsumptionCategory,
    pub scope: ConsumptionScope,
    pub item_name: String,
    pub quantity: f64,
    pub unit: ConsumptionUnit,
    pub source: Option<ConsumptionSource>,
    pub remark: Option<String>,
}

#[derive(Clone)]
pub struct ConsumptionService {
    store: Arc<dyn FleetStore>,
}

impl ConsumptionService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    fn access(&self) -> AccessResolver<'_> {
        AccessResolver::new(self.store.as_ref())
    }

    pub async fn list(&self, actor: &Actor, activity_id: Uuid) -> AppResult<Vec<Consumption>> {
        self.access().activity(actor, activity_id, VoyageGate::Any).await?;
        self.store.list_consumptions(activity_id).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> AppResult<Consumption> {
        let (consumption, _, _) = self.access().consumption(actor, id, VoyageGate::Any).await?;
        Ok(consumption)
    }

    /// Crea el consumo y devuelve además los pares obligatorios que aún faltan
    pub async fn create(&self, actor: &Actor, activity_id: Uuid, draft: ConsumptionDraft) -> AppResult<ConsumptionCreated> {
        let (activity, _) = self
            .access()
            .activity(actor, activity_id, VoyageGate::RequireOpen)
            .await?;

        ensure_positive("quantity", draft.quantity)?;
        let key = ConsumptionKey::new(draft.category, draft.scope);
        enforce_policy(activity.kind(), key, draft.unit)?;

        let created = self
            .store
            .insert_consumption(NewConsumption {
                activity_id,
                category: draft.category,
                scope: draft.scope,
                item_name: draft.item_name,
                quantity: draft.quantity,
                unit: draft.unit,
                source: draft.source.unwrap_or_default(),
                remark: draft.remark,
                created_by_id: actor.id,
            })
            .await?;

        let current = self.store.list_consumptions(activity_id).await?;
        let missing_required = compute_missing_required(policy_for(activity.kind()), &current);

        tracing::info!(
            consumption_id = %created.id,
            %activity_id,
            pair = %key,
            missing = missing_required.len(),
            "Consumption created"
        );
        Ok(ConsumptionCreated {
            created,
            missing_required,
        })
    }

    /// La política se evalúa sobre el registro resultante del merge
    pub async fn update(&self, actor: &Actor, id: Uuid, changes: ConsumptionChanges) -> AppResult<Consumption> {
        let (current, activity, _) = self
            .access()
            .consumption(actor, id, VoyageGate::RequireOpen)
            .await?;

        if let Some(quantity) = changes.quantity {
            ensure_positive("quantity", quantity)?;
        }
        let key = ConsumptionKey::new(
            changes.category.unwrap_or(current.category),
            changes.scope.unwrap_or(current.scope),
        );
        enforce_policy(activity.kind(), key, changes.unit.unwrap_or(current.unit))?;

        self.store
            .update_consumption(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Consumption"))
    }

    pub async fn remove(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        self.access().consumption(actor, id, VoyageGate::RequireOpen).await?;

        if !self.store.set_consumption_active(id, false).await? {
            return Err(not_found_error("Consumption"));
        }
        tracing::info!(consumption_id = %id, "Consumption deactivated");
        Ok(())
    }
}
