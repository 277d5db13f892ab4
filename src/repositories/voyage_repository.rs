use async_trait::async_trait;
use chrono::Utc;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::{map_constraint_error, push_vessel_scope, PgRepository};
use crate::models::activity::ActivityRow;
use crate::models::consumption::MissingRequired;
use crate::models::voyage::{NewVoyage, VoyageChanges, VoyageFilter};
use crate::models::{AccessScope, Activity, Consumption, Voyage, VoyageStatus};
use crate::utils::errors::{invalid_state_error, not_found_error, AppError, AppResult};

pub(crate) const OPEN_VOYAGE_EXISTS: &str = "This vessel already has an OPEN voyage";
pub(crate) const VOYAGE_HAS_DEPENDENTS: &str =
    "Voyage has dependent records (activities, fuel ROB or bunker events)";

/// Lo que falta para cerrar, a partir de las actividades y consumos activos
pub type CloseCheck = fn(&[Activity], &[Consumption]) -> Vec<MissingRequired>;

#[async_trait]
pub trait VoyageStore: Send + Sync {
    /// Voyages activos del buque, `start_at` más reciente primero
    async fn list_voyages(&self, vessel_id: Uuid, filter: &VoyageFilter) -> AppResult<Vec<Voyage>>;

    async fn find_voyage(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Voyage>>;

    /// Comprobación y alta atómicas: InvalidState si el buque ya tiene un
    /// voyage OPEN activo, Conflict si `voy_no` se repite en el buque.
    async fn insert_voyage(&self, voyage: NewVoyage) -> AppResult<Voyage>;

    async fn update_voyage(&self, id: Uuid, changes: VoyageChanges) -> AppResult<Option<Voyage>>;

    /// Comprobación de cierre y paso a CLOSED atómicos. IncompleteForClose si
    /// `check` devuelve faltantes; el voyage queda intacto.
    async fn close_voyage(&self, id: Uuid, check: CloseCheck) -> AppResult<Option<Voyage>>;

    /// Borrado físico; DependencyExists si quedan hijos
    async fn delete_voyage(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
impl VoyageStore for PgRepository {
    async fn list_voyages(&self, vessel_id: Uuid, filter: &VoyageFilter) -> AppResult<Vec<Voyage>> {
        let mut qb = QueryBuilder::new("SELECT * FROM voyages WHERE active = TRUE AND vessel_id = ");
        qb.push_bind(vessel_id);
        if let Some(year) = filter.year {
            qb.push(" AND posting_year = ").push_bind(year);
        }
        if let Some(month) = filter.month {
            qb.push(" AND posting_month = ").push_bind(month);
        }
        qb.push(" ORDER BY start_at DESC");

        let voyages = qb.build_query_as::<Voyage>().fetch_all(&self.pool).await?;
        Ok(voyages)
    }

    async fn find_voyage(&self, id: Uuid, scope: &AccessScope) -> AppResult<Option<Voyage>> {
        let mut qb = QueryBuilder::new(
            "SELECT v.* FROM voyages v JOIN vessels vs ON vs.id = v.vessel_id WHERE v.active = TRUE AND v.id = ",
        );
        qb.push_bind(id);
        push_vessel_scope(&mut qb, scope, "vs");

        let voyage = qb.build_query_as::<Voyage>().fetch_optional(&self.pool).await?;
        Ok(voyage)
    }

    async fn insert_voyage(&self, voyage: NewVoyage) -> AppResult<Voyage> {
        let mut tx = self.pool.begin().await?;

        // Serializa las altas concurrentes sobre el mismo buque
        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM vessels WHERE id = $1 FOR UPDATE")
            .bind(voyage.vessel_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(not_found_error("Vessel"));
        }

        let (open_exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM voyages WHERE vessel_id = $1 AND status = 'OPEN' AND active = TRUE)",
        )
        .bind(voyage.vessel_id)
        .fetch_one(&mut *tx)
        .await?;
        if open_exists {
            return Err(invalid_state_error(OPEN_VOYAGE_EXISTS));
        }

        let created = sqlx::query_as::<_, Voyage>(
            r#"
            INSERT INTO voyages (id, vessel_id, voy_no, start_at, end_at, status, posting_year, posting_month, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(voyage.vessel_id)
        .bind(voyage.voy_no)
        .bind(voyage.start_at)
        .bind(voyage.end_at)
        .bind(VoyageStatus::Open)
        .bind(voyage.posting.year)
        .bind(voyage.posting.month)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_constraint_error)?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_voyage(&self, id: Uuid, changes: VoyageChanges) -> AppResult<Option<Voyage>> {
        let Some(current) = sqlx::query_as::<_, Voyage>("SELECT * FROM voyages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let posting = changes.posting.unwrap_or_else(|| current.posting());
        let updated = sqlx::query_as::<_, Voyage>(
            r#"
            UPDATE voyages
            SET voy_no = $2, start_at = $3, end_at = $4, status = $5,
                posting_year = $6, posting_month = $7, active = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.voy_no.unwrap_or(current.voy_no))
        .bind(changes.start_at.unwrap_or(current.start_at))
        .bind(changes.end_at.or(current.end_at))
        .bind(changes.status.unwrap_or(current.status))
        .bind(posting.year)
        .bind(posting.month)
        .bind(changes.active.unwrap_or(current.active))
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        Ok(Some(updated))
    }

    async fn close_voyage(&self, id: Uuid, check: CloseCheck) -> AppResult<Option<Voyage>> {
        let mut tx = self.pool.begin().await?;

        // Voyage, actividades y consumos quedan bloqueados hasta el commit; las
        // altas de hijos esperan por la FK
        let Some(current) = sqlx::query_as::<_, Voyage>("SELECT * FROM voyages WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        if current.status != VoyageStatus::Open {
            return Err(invalid_state_error("Voyage status is already set"));
        }

        let rows = sqlx::query_as::<_, ActivityRow>("SELECT * FROM activities WHERE voyage_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        let activities = rows
            .into_iter()
            .filter(|row| row.active)
            .map(Activity::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        let consumptions = sqlx::query_as::<_, Consumption>(
            r#"
            SELECT c.* FROM consumptions c
            JOIN activities a ON a.id = c.activity_id
            WHERE a.voyage_id = $1 AND a.active = TRUE AND c.active = TRUE
            FOR UPDATE OF c
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let shortfalls = check(&activities, &consumptions);
        if !shortfalls.is_empty() {
            return Err(AppError::IncompleteForClose(shortfalls));
        }

        let closed = sqlx::query_as::<_, Voyage>("UPDATE voyages SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(VoyageStatus::Closed)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(closed))
    }

    async fn delete_voyage(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM voyages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation()) {
                    AppError::DependencyExists(VOYAGE_HAS_DEPENDENTS.to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Voyage"));
        }
        Ok(())
    }
}
