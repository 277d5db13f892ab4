use async_trait::async_trait;
use chrono::Utc;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::{map_constraint_error, push_vessel_scope, PgRepository};
use crate::models::vessel::{NewVessel, VesselChanges};
use crate::models::{AccessScope, Vessel, VesselAssignment};
use crate::utils::errors::{AppError, AppResult};

/// Buques y asignaciones usuario <-> buque
#[async_trait]
pub trait VesselStore: Send + Sync {
    /// Buques activos visibles para el alcance, ordenados por nombre
    async fn list_vessels(&self, scope: &AccessScope) -> AppResult<Vec<Vessel>>;

    async fn find_vessel(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Vessel>>;

    /// Conflict si el código ya existe
    async fn insert_vessel(&self, vessel: NewVessel) -> AppResult<Vessel>;

    async fn update_vessel(&self, id: Uuid, changes: VesselChanges) -> AppResult<Option<Vessel>>;

    /// `false` si el buque no existe
    async fn deactivate_vessel(&self, id: Uuid) -> AppResult<bool>;

    async fn find_assignment(&self, user_id: Uuid, vessel_id: Uuid) -> AppResult<Option<VesselAssignment>>;

    /// Crea la fila o cambia su flag `active`; nunca la borra
    async fn save_assignment(&self, user_id: Uuid, vessel_id: Uuid, active: bool) -> AppResult<VesselAssignment>;

    /// Asignaciones activas de un buque
    async fn list_assignments(&self, vessel_id: Uuid) -> AppResult<Vec<VesselAssignment>>;
}

#[async_trait]
impl VesselStore for PgRepository {
    async fn list_vessels(&self, scope: &AccessScope) -> AppResult<Vec<Vessel>> {
        let mut qb = QueryBuilder::new("SELECT vs.* FROM vessels vs WHERE TRUE");
        push_vessel_scope(&mut qb, scope, "vs");
        qb.push(" ORDER BY vs.name ASC");

        let vessels = qb.build_query_as::<Vessel>().fetch_all(&self.pool).await?;
        Ok(vessels)
    }

    async fn find_vessel(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Vessel>> {
        let mut qb = QueryBuilder::new("SELECT vs.* FROM vessels vs WHERE vs.id = ");
        qb.push_bind(id);
        push_vessel_scope(&mut qb, scope, "vs");

        let vessel = qb.build_query_as::<Vessel>().fetch_optional(&self.pool).await?;
        Ok(vessel)
    }

    async fn insert_vessel(&self, vessel: NewVessel) -> AppResult<Vessel> {
        let created = sqlx::query_as::<_, Vessel>(
            r#"
            INSERT INTO vessels (id, code, name, type, active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vessel.code)
        .bind(vessel.name)
        .bind(vessel.vessel_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        Ok(created)
    }

    async fn update_vessel(&self, id: Uuid, changes: VesselChanges) -> AppResult<Option<Vessel>> {
        let Some(current) = sqlx::query_as::<_, Vessel>(
            "SELECT * FROM vessels WHERE id = $1 AND active = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, Vessel>(
            r#"
            UPDATE vessels
            SET code = $2, name = $3, type = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.code.unwrap_or(current.code))
        .bind(changes.name.unwrap_or(current.name))
        .bind(changes.vessel_type.or(current.vessel_type))
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        Ok(Some(updated))
    }

    async fn deactivate_vessel(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE vessels SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_assignment(&self, user_id: Uuid, vessel_id: Uuid) -> AppResult<Option<VesselAssignment>> {
        let assignment = sqlx::query_as::<_, VesselAssignment>(
            "SELECT * FROM vessel_assignments WHERE user_id = $1 AND vessel_id = $2",
        )
        .bind(user_id)
        .bind(vessel_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(assignment)
    }

    async fn save_assignment(&self, user_id: Uuid, vessel_id: Uuid, active: bool) -> AppResult<VesselAssignment> {
        let assignment = sqlx::query_as::<_, VesselAssignment>(
            r#"
            INSERT INTO vessel_assignments (id, user_id, vessel_id, active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, vessel_id) DO UPDATE SET active = EXCLUDED.active
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(vessel_id)
        .bind(active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.constraint() == Some("vessel_assignments_user_id_fkey")) {
                AppError::NotFound("User not found".to_string())
            } else {
                map_constraint_error(e)
            }
        })?;
        Ok(assignment)
    }

    async fn list_assignments(&self, vessel_id: Uuid) -> AppResult<Vec<VesselAssignment>> {
        let assignments = sqlx::query_as::<_, VesselAssignment>(
            "SELECT * FROM vessel_assignments WHERE vessel_id = $1 AND active = TRUE ORDER BY created_at ASC",
        )
        .bind(vessel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }
}
