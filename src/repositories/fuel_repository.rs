use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::PgRepository;
use crate::models::fuel::{BunkerChanges, NewBunker, FUEL_UNIT};
use crate::models::{FuelBunkerEvent, FuelRob};
use crate::utils::errors::AppResult;

/// ROB y bunkering por voyage. El acceso al voyage lo resuelve el servicio.
#[async_trait]
pub trait FuelStore: Send + Sync {
    async fn find_fuel_rob(&self, voyage_id: Uuid) -> AppResult<Option<FuelRob>>;

    /// Crea la fila con {0, 0, "L"} si no existe y aplica solo los valores recibidos
    async fn upsert_fuel_rob(
        &self,
        voyage_id: Uuid,
        opening_rob: Option<f64>,
        closing_rob: Option<f64>,
    ) -> AppResult<FuelRob>;

    /// Eventos del voyage ordenados por `at`
    async fn list_bunkers(&self, voyage_id: Uuid) -> AppResult<Vec<FuelBunkerEvent>>;

    async fn find_bunker(&self, id: Uuid) -> AppResult<Option<FuelBunkerEvent>>;

    async fn insert_bunker(&self, bunker: NewBunker) -> AppResult<FuelBunkerEvent>;

    async fn update_bunker(&self, id: Uuid, changes: BunkerChanges) -> AppResult<Option<FuelBunkerEvent>>;

    /// Borrado físico
    async fn delete_bunker(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
impl FuelStore for PgRepository {
    async fn find_fuel_rob(&self, voyage_id: Uuid) -> AppResult<Option<FuelRob>> {
        let rob = sqlx::query_as::<_, FuelRob>(
            "SELECT voyage_id, opening_rob, closing_rob, unit FROM fuel_robs WHERE voyage_id = $1",
        )
        .bind(voyage_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rob)
    }

    async fn upsert_fuel_rob(
        &self,
        voyage_id: Uuid,
        opening_rob: Option<f64>,
        closing_rob: Option<f64>,
    ) -> AppResult<FuelRob> {
        let rob = sqlx::query_as::<_, FuelRob>(
            r#"
            INSERT INTO fuel_robs (voyage_id, opening_rob, closing_rob, unit)
            VALUES ($1, COALESCE($2, 0), COALESCE($3, 0), $4)
            ON CONFLICT (voyage_id) DO UPDATE SET
                opening_rob = COALESCE($2, fuel_robs.opening_rob),
                closing_rob = COALESCE($3, fuel_robs.closing_rob)
            RETURNING voyage_id, opening_rob, closing_rob, unit
            "#,
        )
        .bind(voyage_id)
        .bind(opening_rob)
        .bind(closing_rob)
        .bind(FUEL_UNIT)
        .fetch_one(&self.pool)
        .await?;
        Ok(rob)
    }

    async fn list_bunkers(&self, voyage_id: Uuid) -> AppResult<Vec<FuelBunkerEvent>> {
        let bunkers = sqlx::query_as::<_, FuelBunkerEvent>(
            "SELECT * FROM fuel_bunker_events WHERE voyage_id = $1 ORDER BY at ASC",
        )
        .bind(voyage_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bunkers)
    }

    async fn find_bunker(&self, id: Uuid) -> AppResult<Option<FuelBunkerEvent>> {
        let bunker = sqlx::query_as::<_, FuelBunkerEvent>("SELECT * FROM fuel_bunker_events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(bunker)
    }

    async fn insert_bunker(&self, bunker: NewBunker) -> AppResult<FuelBunkerEvent> {
        let created = sqlx::query_as::<_, FuelBunkerEvent>(
            r#"
            INSERT INTO fuel_bunker_events (id, voyage_id, at, amount, unit, remark, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(bunker.voyage_id)
        .bind(bunker.at)
        .bind(bunker.amount)
        .bind(FUEL_UNIT)
        .bind(bunker.remark)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_bunker(&self, id: Uuid, changes: BunkerChanges) -> AppResult<Option<FuelBunkerEvent>> {
        let bunker = sqlx::query_as::<_, FuelBunkerEvent>(
            r#"
            UPDATE fuel_bunker_events
            SET at = COALESCE($2, at), amount = COALESCE($3, amount), remark = COALESCE($4, remark)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.at)
        .bind(changes.amount)
        .bind(changes.remark)
        .fetch_optional(&self.pool)
        .await?;
        Ok(bunker)
    }

    async fn delete_bunker(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM fuel_bunker_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
