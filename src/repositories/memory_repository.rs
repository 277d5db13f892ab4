//! Almacén en memoria
//!
//! Implementa los mismos traits que `PgRepository` sobre tablas en memoria
//! protegidas por un `RwLock`. Se usa en los tests y en desarrollo cuando no
//! hay `DATABASE_URL`. Las restricciones de la base (unicidad, un solo voyage
//! OPEN por buque, claves foráneas sin cascada) se comprueban bajo el lock de
//! escritura.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::voyage_repository::{CloseCheck, OPEN_VOYAGE_EXISTS, VOYAGE_HAS_DEPENDENTS};
use super::{ActivityStore, ConsumptionStore, FuelStore, VesselStore, VoyageStore};
use crate::models::activity::{ActivityRevision, NewActivity};
use crate::models::consumption::{ConsumptionChanges, NewConsumption};
use crate::models::fuel::{BunkerChanges, NewBunker, FUEL_UNIT};
use crate::models::vessel::{NewVessel, VesselChanges};
use crate::models::voyage::{NewVoyage, VoyageChanges, VoyageFilter};
use crate::models::{
    AccessScope, Activity, Consumption, FuelBunkerEvent, FuelRob, Vessel, VesselAssignment, Voyage,
    VoyageStatus,
};
use crate::utils::errors::{invalid_state_error, not_found_error, AppError, AppResult};

#[derive(Default)]
struct Tables {
    vessels: HashMap<Uuid, Vessel>,
    assignments: Vec<VesselAssignment>,
    voyages: HashMap<Uuid, Voyage>,
    activities: HashMap<Uuid, Activity>,
    consumptions: HashMap<Uuid, Consumption>,
    fuel_robs: HashMap<Uuid, FuelRob>,
    bunkers: HashMap<Uuid, FuelBunkerEvent>,
    /// Tabla users; `None` acepta cualquier identidad del token
    users: Option<HashSet<Uuid>>,
}

impl Tables {
    /// Mismo predicado que `push_vessel_scope`
    fn vessel_visible(&self, vessel_id: Uuid, scope: &AccessScope) -> bool {
        let Some(vessel) = self.vessels.get(&vessel_id) else {
            return false;
        };
        vessel.active
            && scope.admits(
                self.assignments
                    .iter()
                    .filter(|a| a.vessel_id == vessel_id && a.active)
                    .map(|a| a.user_id),
            )
    }

    fn visible_voyage(&self, id: Uuid, scope: &AccessScope) -> Option<&Voyage> {
        self.voyages
            .get(&id)
            .filter(|v| v.active && self.vessel_visible(v.vessel_id, scope))
    }

    fn visible_activity(&self, id: Uuid, scope: &AccessScope) -> Option<&Activity> {
        self.activities
            .get(&id)
            .filter(|a| a.active && self.visible_voyage(a.voyage_id, scope).is_some())
    }

    /// Actividades activas del voyage, `start_at` más reciente primero
    fn voyage_activities(&self, voyage_id: Uuid) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .activities
            .values()
            .filter(|a| a.voyage_id == voyage_id && a.active)
            .cloned()
            .collect();
        activities.sort_by(|a, b| b.start_at.cmp(&a.start_at));
        activities
    }

    /// Consumos activos de las actividades activas del voyage
    fn voyage_consumptions(&self, voyage_id: Uuid) -> Vec<Consumption> {
        let mut consumptions: Vec<Consumption> = self
            .consumptions
            .values()
            .filter(|c| {
                c.active
                    && self
                        .activities
                        .get(&c.activity_id)
                        .map_or(false, |a| a.voyage_id == voyage_id && a.active)
            })
            .cloned()
            .collect();
        consumptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        consumptions
    }

    fn ensure_single_open(&self, vessel_id: Uuid, except: Option<Uuid>) -> AppResult<()> {
        let open_exists = self.voyages.values().any(|v| {
            v.vessel_id == vessel_id && v.is_open() && v.active && Some(v.id) != except
        });
        if open_exists {
            return Err(invalid_state_error(OPEN_VOYAGE_EXISTS));
        }
        Ok(())
    }

    fn ensure_unique_voy_no(&self, vessel_id: Uuid, voy_no: &str, except: Option<Uuid>) -> AppResult<()> {
        let taken = self
            .voyages
            .values()
            .any(|v| v.vessel_id == vessel_id && v.voy_no == voy_no && Some(v.id) != except);
        if taken {
            return Err(AppError::Conflict(
                "Voyage number already exists for this vessel".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_unique_code(&self, code: &str, except: Option<Uuid>) -> AppResult<()> {
        if self.vessels.values().any(|v| v.code == code && Some(v.id) != except) {
            return Err(AppError::Conflict("Vessel code already exists".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Almacén con tabla de usuarios: asignar un usuario desconocido es NotFound
    pub fn with_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = Uuid>,
    {
        let tables = Tables {
            users: Some(users.into_iter().collect()),
            ..Default::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl VesselStore for MemoryRepository {
    async fn list_vessels(&self, scope: &AccessScope) -> AppResult<Vec<Vessel>> {
        let tables = self.tables.read().await;
        let mut vessels: Vec<Vessel> = tables
            .vessels
            .values()
            .filter(|v| tables.vessel_visible(v.id, scope))
            .cloned()
            .collect();
        vessels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vessels)
    }

    async fn find_vessel(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Vessel>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vessels
            .get(&id)
            .filter(|_| tables.vessel_visible(id, scope))
            .cloned())
    }

    async fn insert_vessel(&self, vessel: NewVessel) -> AppResult<Vessel> {
        let mut tables = self.tables.write().await;
        tables.ensure_unique_code(&vessel.code, None)?;

        let created = Vessel {
            id: Uuid::new_v4(),
            code: vessel.code,
            name: vessel.name,
            vessel_type: vessel.vessel_type,
            active: true,
            created_at: Utc::now(),
        };
        tables.vessels.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_vessel(&self, id: Uuid, changes: VesselChanges) -> AppResult<Option<Vessel>> {
        let mut tables = self.tables.write().await;
        if let Some(code) = &changes.code {
            tables.ensure_unique_code(code, Some(id))?;
        }

        let Some(vessel) = tables.vessels.get_mut(&id).filter(|v| v.active) else {
            return Ok(None);
        };
        if let Some(code) = changes.code {
            vessel.code = code;
        }
        if let Some(name) = changes.name {
            vessel.name = name;
        }
        if let Some(vessel_type) = changes.vessel_type {
            vessel.vessel_type = Some(vessel_type);
        }
        Ok(Some(vessel.clone()))
    }

    async fn deactivate_vessel(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.vessels.get_mut(&id) {
            Some(vessel) => {
                vessel.active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_assignment(&self, user_id: Uuid, vessel_id: Uuid) -> AppResult<Option<VesselAssignment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .find(|a| a.user_id == user_id && a.vessel_id == vessel_id)
            .cloned())
    }

    async fn save_assignment(&self, user_id: Uuid, vessel_id: Uuid, active: bool) -> AppResult<VesselAssignment> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .assignments
            .iter_mut()
            .find(|a| a.user_id == user_id && a.vessel_id == vessel_id)
        {
            existing.active = active;
            return Ok(existing.clone());
        }
        if tables.users.as_ref().is_some_and(|users| !users.contains(&user_id)) {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let assignment = VesselAssignment {
            id: Uuid::new_v4(),
            user_id,
            vessel_id,
            active,
            created_at: Utc::now(),
        };
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn list_assignments(&self, vessel_id: Uuid) -> AppResult<Vec<VesselAssignment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| a.vessel_id == vessel_id && a.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VoyageStore for MemoryRepository {
    async fn list_voyages(&self, vessel_id: Uuid, filter: &VoyageFilter) -> AppResult<Vec<Voyage>> {
        let tables = self.tables.read().await;
        let mut voyages: Vec<Voyage> = tables
            .voyages
            .values()
            .filter(|v| v.vessel_id == vessel_id && v.active && filter.matches(v))
            .cloned()
            .collect();
        voyages.sort_by(|a, b| b.start_at.cmp(&a.start_at));
        Ok(voyages)
    }

    async fn find_voyage(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Voyage>> {
        let tables = self.tables.read().await;
        Ok(tables.visible_voyage(id, scope).cloned())
    }

    async fn insert_voyage(&self, voyage: NewVoyage) -> AppResult<Voyage> {
        let mut tables = self.tables.write().await;
        if !tables.vessels.contains_key(&voyage.vessel_id) {
            return Err(not_found_error("Vessel"));
        }
        tables.ensure_single_open(voyage.vessel_id, None)?;
        tables.ensure_unique_voy_no(voyage.vessel_id, &voyage.voy_no, None)?;

        let created = Voyage {
            id: Uuid::new_v4(),
            vessel_id: voyage.vessel_id,
            voy_no: voyage.voy_no,
            start_at: voyage.start_at,
            end_at: voyage.end_at,
            status: VoyageStatus::Open,
            posting_year: voyage.posting.year,
            posting_month: voyage.posting.month,
            active: true,
            created_at: Utc::now(),
        };
        tables.voyages.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_voyage(&self, id: Uuid, changes: VoyageChanges) -> AppResult<Option<Voyage>> {
        let mut tables = self.tables.write().await;
        let Some(mut next) = tables.voyages.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(voy_no) = changes.voy_no {
            next.voy_no = voy_no;
        }
        if let Some(start_at) = changes.start_at {
            next.start_at = start_at;
        }
        if let Some(end_at) = changes.end_at {
            next.end_at = Some(end_at);
        }
        if let Some(status) = changes.status {
            next.status = status;
        }
        if let Some(posting) = changes.posting {
            next.posting_year = posting.year;
            next.posting_month = posting.month;
        }
        if let Some(active) = changes.active {
            next.active = active;
        }

        tables.ensure_unique_voy_no(next.vessel_id, &next.voy_no, Some(id))?;
        if next.is_open() && next.active {
            tables.ensure_single_open(next.vessel_id, Some(id))?;
        }

        tables.voyages.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn close_voyage(&self, id: Uuid, check: CloseCheck) -> AppResult<Option<Voyage>> {
        let mut tables = self.tables.write().await;
        match tables.voyages.get(&id) {
            None => return Ok(None),
            Some(voyage) if voyage.status != VoyageStatus::Open => {
                return Err(invalid_state_error("Voyage status is already set"));
            }
            Some(_) => {}
        }

        let shortfalls = check(&tables.voyage_activities(id), &tables.voyage_consumptions(id));
        if !shortfalls.is_empty() {
            return Err(AppError::IncompleteForClose(shortfalls));
        }

        let Some(voyage) = tables.voyages.get_mut(&id) else {
            return Ok(None);
        };
        voyage.status = VoyageStatus::Closed;
        Ok(Some(voyage.clone()))
    }

    async fn delete_voyage(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.voyages.contains_key(&id) {
            return Err(not_found_error("Voyage"));
        }

        let has_dependents = tables.activities.values().any(|a| a.voyage_id == id)
            || tables.fuel_robs.contains_key(&id)
            || tables.bunkers.values().any(|b| b.voyage_id == id);
        if has_dependents {
            return Err(AppError::DependencyExists(VOYAGE_HAS_DEPENDENTS.to_string()));
        }

        tables.voyages.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ActivityStore for MemoryRepository {
    async fn list_activities(&self, voyage_id: Uuid) -> AppResult<Vec<Activity>> {
        let tables = self.tables.read().await;
        Ok(tables.voyage_activities(voyage_id))
    }

    async fn find_activity(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Activity>> {
        let tables = self.tables.read().await;
        Ok(tables.visible_activity(id, scope).cloned())
    }

    async fn insert_activity(&self, activity: NewActivity) -> AppResult<Activity> {
        let mut tables = self.tables.write().await;
        if !tables.voyages.contains_key(&activity.voyage_id) {
            return Err(not_found_error("Voyage"));
        }

        let period = activity.segment.period();
        let created = Activity {
            id: Uuid::new_v4(),
            voyage_id: activity.voyage_id,
            start_at: activity.segment.start_at,
            end_at: activity.segment.end_at,
            year: period.year,
            month: period.month,
            details: activity.segment.details,
            active: true,
            created_by_id: activity.created_by_id,
            created_at: Utc::now(),
        };
        tables.activities.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_activity(&self, id: Uuid, revision: ActivityRevision) -> AppResult<Option<Activity>> {
        let mut tables = self.tables.write().await;
        let Some(activity) = tables.activities.get_mut(&id) else {
            return Ok(None);
        };

        let period = revision.segment.period();
        activity.start_at = revision.segment.start_at;
        activity.end_at = revision.segment.end_at;
        activity.year = period.year;
        activity.month = period.month;
        activity.details = revision.segment.details;
        if let Some(active) = revision.active {
            activity.active = active;
        }
        Ok(Some(activity.clone()))
    }

    async fn set_activity_active(&self, id: Uuid, active: bool) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.activities.get_mut(&id) {
            Some(activity) => {
                activity.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ConsumptionStore for MemoryRepository {
    async fn list_consumptions(&self, activity_id: Uuid) -> AppResult<Vec<Consumption>> {
        let tables = self.tables.read().await;
        let mut consumptions: Vec<Consumption> = tables
            .consumptions
            .values()
            .filter(|c| c.activity_id == activity_id && c.active)
            .cloned()
            .collect();
        consumptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(consumptions)
    }

    async fn list_voyage_consumptions(&self, voyage_id: Uuid) -> AppResult<Vec<Consumption>> {
        let tables = self.tables.read().await;
        Ok(tables.voyage_consumptions(voyage_id))
    }

    async fn find_consumption(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Consumption>> {
        let tables = self.tables.read().await;
        Ok(tables
            .consumptions
            .get(&id)
            .filter(|c| c.active && tables.visible_activity(c.activity_id, scope).is_some())
            .cloned())
    }

    async fn insert_consumption(&self, consumption: NewConsumption) -> AppResult<Consumption> {
        let mut tables = self.tables.write().await;
        if !tables.activities.contains_key(&consumption.activity_id) {
            return Err(not_found_error("Activity"));
        }

        let created = Consumption {
            id: Uuid::new_v4(),
            activity_id: consumption.activity_id,
            category: consumption.category,
            scope: consumption.scope,
            item_name: consumption.item_name,
            quantity: consumption.quantity,
            unit: consumption.unit,
            source: consumption.source,
            remark: consumption.remark,
            active: true,
            created_by_id: consumption.created_by_id,
            created_at: Utc::now(),
        };
        tables.consumptions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_consumption(&self, id: Uuid, changes: ConsumptionChanges) -> AppResult<Option<Consumption>> {
        let mut tables = self.tables.write().await;
        let Some(consumption) = tables.consumptions.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(category) = changes.category {
            consumption.category = category;
        }
        if let Some(scope) = changes.scope {
            consumption.scope = scope;
        }
        if let Some(item_name) = changes.item_name {
            consumption.item_name = item_name;
        }
        if let Some(quantity) = changes.quantity {
            consumption.quantity = quantity;
        }
        if let Some(unit) = changes.unit {
            consumption.unit = unit;
        }
        if let Some(source) = changes.source {
            consumption.source = source;
        }
        if let Some(remark) = changes.remark {
            consumption.remark = Some(remark);
        }
        if let Some(active) = changes.active {
            consumption.active = active;
        }
        Ok(Some(consumption.clone()))
    }

    async fn set_consumption_active(&self, id: Uuid, active: bool) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.consumptions.get_mut(&id) {
            Some(consumption) => {
                consumption.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl FuelStore for MemoryRepository {
    async fn find_fuel_rob(&self, voyage_id: Uuid) -> AppResult<Option<FuelRob>> {
        let tables = self.tables.read().await;
        Ok(tables.fuel_robs.get(&voyage_id).cloned())
    }

    async fn upsert_fuel_rob(
        &self,
        voyage_id: Uuid,
        opening_rob: Option<f64>,
        closing_rob: Option<f64>,
    ) -> AppResult<FuelRob> {
        let mut tables = self.tables.write().await;
        let rob = tables.fuel_robs.entry(voyage_id).or_insert_with(|| FuelRob {
            voyage_id,
            opening_rob: 0.0,
            closing_rob: 0.0,
            unit: FUEL_UNIT.to_string(),
        });
        if let Some(opening) = opening_rob {
            rob.opening_rob = opening;
        }
        if let Some(closing) = closing_rob {
            rob.closing_rob = closing;
        }
        Ok(rob.clone())
    }

    async fn list_bunkers(&self, voyage_id: Uuid) -> AppResult<Vec<FuelBunkerEvent>> {
        let tables = self.tables.read().await;
        let mut bunkers: Vec<FuelBunkerEvent> = tables
            .bunkers
            .values()
            .filter(|b| b.voyage_id == voyage_id)
            .cloned()
            .collect();
        bunkers.sort_by(|a, b| a.at.cmp(&b.at));
        Ok(bunkers)
    }

    async fn find_bunker(&self, id: Uuid) -> AppResult<Option<FuelBunkerEvent>> {
        let tables = self.tables.read().await;
        Ok(tables.bunkers.get(&id).cloned())
    }

    async fn insert_bunker(&self, bunker: NewBunker) -> AppResult<FuelBunkerEvent> {
        let mut tables = self.tables.write().await;
        let created = FuelBunkerEvent {
            id: Uuid::new_v4(),
            voyage_id: bunker.voyage_id,
            at: bunker.at,
            amount: bunker.amount,
            unit: FUEL_UNIT.to_string(),
            remark: bunker.remark,
            created_at: Utc::now(),
        };
        tables.bunkers.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_bunker(&self, id: Uuid, changes: BunkerChanges) -> AppResult<Option<FuelBunkerEvent>> {
        let mut tables = self.tables.write().await;
        let Some(bunker) = tables.bunkers.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(at) = changes.at {
            bunker.at = at;
        }
        if let Some(amount) = changes.amount {
            bunker.amount = amount;
        }
        if let Some(remark) = changes.remark {
            bunker.remark = Some(remark);
        }
        Ok(Some(bunker.clone()))
    }

    async fn delete_bunker(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.bunkers.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostingPeriod;
    use chrono::TimeZone;

    fn new_voyage(vessel_id: Uuid, voy_no: &str) -> NewVoyage {
        NewVoyage {
            vessel_id,
            voy_no: voy_no.to_string(),
            start_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            end_at: None,
            posting: PostingPeriod::new(2025, 1),
        }
    }

    async fn vessel(repo: &MemoryRepository, code: &str) -> Vessel {
        repo.insert_vessel(NewVessel {
            code: code.to_string(),
            name: format!("MV {code}"),
            vessel_type: None,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_single_open_voyage_per_vessel() {
        let repo = MemoryRepository::new();
        let v1 = vessel(&repo, "V1").await;

        let first = repo.insert_voyage(new_voyage(v1.id, "001")).await.unwrap();
        assert!(matches!(
            repo.insert_voyage(new_voyage(v1.id, "002")).await,
            Err(AppError::InvalidState(_))
        ));

        repo.update_voyage(
            first.id,
            VoyageChanges {
                status: Some(VoyageStatus::Closed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            repo.insert_voyage(new_voyage(v1.id, "001")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(repo.insert_voyage(new_voyage(v1.id, "002")).await.is_ok());
    }

    #[tokio::test]
    async fn test_scope_hides_unassigned_and_inactive_vessels() {
        let repo = MemoryRepository::new();
        let v1 = vessel(&repo, "V1").await;
        let v2 = vessel(&repo, "V2").await;
        let user = Uuid::new_v4();
        repo.save_assignment(user, v1.id, true).await.unwrap();

        let scope = AccessScope::Assigned(user);
        assert!(repo.find_vessel(v1.id, &scope).await.unwrap().is_some());
        assert!(repo.find_vessel(v2.id, &scope).await.unwrap().is_none());

        repo.deactivate_vessel(v1.id).await.unwrap();
        assert!(repo.find_vessel(v1.id, &scope).await.unwrap().is_none());
        assert!(repo.find_vessel(v1.id, &AccessScope::Fleet).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_voyage_with_bunker_is_blocked() {
        let repo = MemoryRepository::new();
        let v1 = vessel(&repo, "V1").await;
        let voyage = repo.insert_voyage(new_voyage(v1.id, "001")).await.unwrap();
        let bunker = repo
            .insert_bunker(NewBunker {
                voyage_id: voyage.id,
                at: Utc::now(),
                amount: 500.0,
                remark: None,
            })
            .await
            .unwrap();

        assert!(matches!(
            repo.delete_voyage(voyage.id).await,
            Err(AppError::DependencyExists(_))
        ));
        assert!(repo.delete_bunker(bunker.id).await.unwrap());
        assert!(repo.delete_voyage(voyage.id).await.is_ok());
        assert!(matches!(repo.delete_voyage(voyage.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_close_checks_and_writes_under_one_lock() {
        use crate::models::{ActivityFields, ActivitySegment, ActivityType};
        use crate::services::consumption_policy::close_shortfalls;

        let repo = MemoryRepository::new();
        let v1 = vessel(&repo, "V1").await;
        let voyage = repo.insert_voyage(new_voyage(v1.id, "001")).await.unwrap();
        let start = Utc.with_ymd_and_hms(2025, 1, 2, 6, 0, 0).unwrap();
        let segment = ActivitySegment::validate(
            ActivityType::Anchoring,
            start,
            start + chrono::Duration::hours(4),
            &ActivityFields::default(),
        )
        .unwrap();
        let anchoring = repo
            .insert_activity(NewActivity {
                voyage_id: voyage.id,
                segment,
                created_by_id: Uuid::new_v4(),
            })
            .await
            .unwrap();

        match repo.close_voyage(voyage.id, close_shortfalls).await {
            Err(AppError::IncompleteForClose(problems)) => {
                assert_eq!(problems.len(), 1);
                assert_eq!(problems[0].activity_id, anchoring.id);
            }
            other => panic!("unexpected result {other:?}"),
        }
        let still_open = repo.find_voyage(voyage.id, &AccessScope::Fleet).await.unwrap().unwrap();
        assert_eq!(still_open.status, VoyageStatus::Open);

        assert!(repo.set_activity_active(anchoring.id, false).await.unwrap());
        let closed = repo.close_voyage(voyage.id, close_shortfalls).await.unwrap().unwrap();
        assert_eq!(closed.status, VoyageStatus::Closed);

        assert!(matches!(
            repo.close_voyage(voyage.id, close_shortfalls).await,
            Err(AppError::InvalidState(_))
        ));
        assert!(repo.close_voyage(Uuid::new_v4(), close_shortfalls).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_be_assigned() {
        let known = Uuid::new_v4();
        let repo = MemoryRepository::with_users([known]);
        let v1 = vessel(&repo, "V1").await;

        match repo.save_assignment(Uuid::new_v4(), v1.id, true).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "User not found"),
            other => panic!("unexpected result {other:?}"),
        }
        let assignment = repo.save_assignment(known, v1.id, true).await.unwrap();
        assert!(assignment.active);
        assert_eq!(repo.list_assignments(v1.id).await.unwrap().len(), 1);
    }
}
