use async_trait::async_trait;
use chrono::Utc;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::{push_vessel_scope, PgRepository};
use crate::models::consumption::{ConsumptionChanges, NewConsumption};
use crate::models::{AccessScope, Consumption};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ConsumptionStore: Send + Sync {
    /// Consumos activos de la actividad, más recientes primero
    async fn list_consumptions(&self, activity_id: Uuid) -> AppResult<Vec<Consumption>>;

    /// Consumos activos de todas las actividades activas del voyage, en una sola lectura
    async fn list_voyage_consumptions(&self, voyage_id: Uuid) -> AppResult<Vec<Consumption>>;

    async fn find_consumption(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Consumption>>;

    async fn insert_consumption(&self, consumption: NewConsumption) -> AppResult<Consumption>;

    async fn update_consumption(&self, id: Uuid, changes: ConsumptionChanges) -> AppResult<Option<Consumption>>;

    async fn set_consumption_active(&self, id: Uuid, active: bool) -> AppResult<bool>;
}

#[async_trait]
impl ConsumptionStore for PgRepository {
    async fn list_consumptions(&self, activity_id: Uuid) -> AppResult<Vec<Consumption>> {
        let consumptions = sqlx::query_as::<_, Consumption>(
            "SELECT * FROM consumptions WHERE activity_id = $1 AND active = TRUE ORDER BY created_at DESC",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(consumptions)
    }

    async fn list_voyage_consumptions(&self, voyage_id: Uuid) -> AppResult<Vec<Consumption>> {
        let consumptions = sqlx::query_as::<_, Consumption>(
            r#"
            SELECT c.* FROM consumptions c
            JOIN activities a ON a.id = c.activity_id
            WHERE a.voyage_id = $1 AND a.active = TRUE AND c.active = TRUE
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(voyage_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(consumptions)
    }

    async fn find_consumption(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Consumption>> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT c.* FROM consumptions c
            JOIN activities a ON a.id = c.activity_id AND a.active = TRUE
            JOIN voyages v ON v.id = a.voyage_id AND v.active = TRUE
            JOIN vessels vs ON vs.id = v.vessel_id
            WHERE c.active = TRUE AND c.id = "#,
        );
        qb.push_bind(id);
        push_vessel_scope(&mut qb, scope, "vs");

        let consumption = qb.build_query_as::<Consumption>().fetch_optional(&self.pool).await?;
        Ok(consumption)
    }

    async fn insert_consumption(&self, consumption: NewConsumption) -> AppResult<Consumption> {
        let created = sqlx::query_as::<_, Consumption>(
            r#"
            INSERT INTO consumptions (
                id, activity_id, category, scope, item_name, quantity, unit,
                source, remark, active, created_by_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(consumption.activity_id)
        .bind(consumption.category)
        .bind(consumption.scope)
        .bind(consumption.item_name)
        .bind(consumption.quantity)
        .bind(consumption.unit)
        .bind(consumption.source)
        .bind(consumption.remark)
        .bind(consumption.created_by_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_consumption(&self, id: Uuid, changes: ConsumptionChanges) -> AppResult<Option<Consumption>> {
        let Some(current) = sqlx::query_as::<_, Consumption>("SELECT * FROM consumptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, Consumption>(
            r#"
            UPDATE consumptions
            SET category = $2, scope = $3, item_name = $4, quantity = $5,
                unit = $6, source = $7, remark = $8, active = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.category.unwrap_or(current.category))
        .bind(changes.scope.unwrap_or(current.scope))
        .bind(changes.item_name.unwrap_or(current.item_name))
        .bind(changes.quantity.unwrap_or(current.quantity))
        .bind(changes.unit.unwrap_or(current.unit))
        .bind(changes.source.unwrap_or(current.source))
        .bind(changes.remark.or(current.remark))
        .bind(changes.active.unwrap_or(current.active))
        .fetch_one(&self.pool)
        .await?;
        Ok(Some(updated))
    }

    async fn set_consumption_active(&self, id: Uuid, active: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE consumptions SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
