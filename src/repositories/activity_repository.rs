use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use super::{push_vessel_scope, PgRepository};
use crate::models::activity::{ActivityRevision, ActivityRow, ActivitySegment, NewActivity};
use crate::models::{AccessScope, Activity};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Actividades activas del voyage, `start_at` más reciente primero
    async fn list_activities(&self, voyage_id: Uuid) -> AppResult<Vec<Activity>>;

    async fn find_activity(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Activity>>;

    async fn insert_activity(&self, activity: NewActivity) -> AppResult<Activity>;

    /// Reescribe el segmento completo (year/month se recalculan desde startAt)
    async fn update_activity(&self, id: Uuid, revision: ActivityRevision) -> AppResult<Option<Activity>>;

    async fn set_activity_active(&self, id: Uuid, active: bool) -> AppResult<bool>;
}

async fn fetch_one_activity(pool: &PgPool, id: Uuid) -> AppResult<Option<Activity>> {
    let row = sqlx::query_as::<_, ActivityRow>("SELECT * FROM activities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(Activity::try_from).transpose()
}

#[async_trait]
impl ActivityStore for PgRepository {
    async fn list_activities(&self, voyage_id: Uuid) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            "SELECT * FROM activities WHERE voyage_id = $1 AND active = TRUE ORDER BY start_at DESC",
        )
        .bind(voyage_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Activity::try_from).collect()
    }

    async fn find_activity(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Activity>> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT a.* FROM activities a
            JOIN voyages v ON v.id = a.voyage_id AND v.active = TRUE
            JOIN vessels vs ON vs.id = v.vessel_id
            WHERE a.active = TRUE AND a.id = "#,
        );
        qb.push_bind(id);
        push_vessel_scope(&mut qb, scope, "vs");

        let row = qb.build_query_as::<ActivityRow>().fetch_optional(&self.pool).await?;
        row.map(Activity::try_from).transpose()
    }

    async fn insert_activity(&self, activity: NewActivity) -> AppResult<Activity> {
        let id = Uuid::new_v4();
        let mut qb = QueryBuilder::new(
            r#"
            INSERT INTO activities (
                id, voyage_id, created_by_id, created_at, active,
                activity_type, start_at, end_at, year, month,
                container_count, total_container_weight, reefer_count,
                main_engine_count, main_engine_hours, generator_count, generator_hours,
                fuel_used, avg_speed, remark
            ) VALUES ("#,
        );
        {
            let mut values = qb.separated(", ");
            values.push_bind(id);
            values.push_bind(activity.voyage_id);
            values.push_bind(activity.created_by_id);
            values.push_bind(Utc::now());
            values.push_bind(true);
        }
        qb.push(", ");
        push_segment_values(&mut qb, &activity.segment);
        qb.push(") RETURNING *");

        let row = qb.build_query_as::<ActivityRow>().fetch_one(&self.pool).await?;
        Activity::try_from(row)
    }

    async fn update_activity(&self, id: Uuid, revision: ActivityRevision) -> AppResult<Option<Activity>> {
        let Some(current) = fetch_one_activity(&self.pool, id).await? else {
            return Ok(None);
        };

        let mut qb = QueryBuilder::new(
            r#"
            UPDATE activities SET (
                activity_type, start_at, end_at, year, month,
                container_count, total_container_weight, reefer_count,
                main_engine_count, main_engine_hours, generator_count, generator_hours,
                fuel_used, avg_speed, remark, active
            ) = ("#,
        );
        push_segment_values(&mut qb, &revision.segment);
        qb.push(", ")
            .push_bind(revision.active.unwrap_or(current.active))
            .push(") WHERE id = ")
            .push_bind(id)
            .push(" RETURNING *");

        let row = qb.build_query_as::<ActivityRow>().fetch_one(&self.pool).await?;
        Activity::try_from(row).map(Some)
    }

    async fn set_activity_active(&self, id: Uuid, active: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE activities SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Columnas del segmento en el orden de los INSERT/UPDATE de arriba
fn push_segment_values(qb: &mut QueryBuilder<'_, sqlx::Postgres>, segment: &ActivitySegment) {
    let period = segment.period();
    let fields = segment.details.fields();

    let mut values = qb.separated(", ");
    values.push_bind(segment.details.kind());
    values.push_bind(segment.start_at);
    values.push_bind(segment.end_at);
    values.push_bind(period.year);
    values.push_bind(period.month);
    values.push_bind(fields.container_count);
    values.push_bind(fields.total_container_weight);
    values.push_bind(fields.reefer_count);
    values.push_bind(fields.main_engine_count);
    values.push_bind(fields.main_engine_hours);
    values.push_bind(fields.generator_count);
    values.push_bind(fields.generator_hours);
    values.push_bind(fields.fuel_used);
    values.push_bind(fields.avg_speed);
    values.push_bind(fields.remark);
}
