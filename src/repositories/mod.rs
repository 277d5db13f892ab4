//! Repositorios
//!
//! Cada agregado expone un trait de almacenamiento; `PgRepository`
//! (PostgreSQL vía SQLx) y `MemoryRepository` implementan todos.
//!
//! Contrato común de los lectores con alcance (`find_*(id, scope)`): el
//! registro y toda su cadena hacia el buque deben estar activos y el buque
//! debe pasar el `AccessScope`. Si no, `Ok(None)`.

pub mod activity_repository;
pub mod consumption_repository;
pub mod fuel_repository;
pub mod memory_repository;
pub mod vessel_repository;
pub mod voyage_repository;

pub use activity_repository::ActivityStore;
pub use consumption_repository::ConsumptionStore;
pub use fuel_repository::FuelStore;
pub use memory_repository::MemoryRepository;
pub use vessel_repository::VesselStore;
pub use voyage_repository::{CloseCheck, VoyageStore};

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::AccessScope;
use crate::utils::errors::{invalid_state_error, AppError};
use voyage_repository::OPEN_VOYAGE_EXISTS;

/// Almacén completo que consumen los servicios
pub trait FleetStore: VesselStore + VoyageStore + ActivityStore + ConsumptionStore + FuelStore {}

impl<T> FleetStore for T where T: VesselStore + VoyageStore + ActivityStore + ConsumptionStore + FuelStore {}

/// Implementación PostgreSQL
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Añade a la consulta el predicado de visibilidad sobre el alias del buque.
///
/// Es el único sitio donde se traduce `AccessScope` a SQL.
pub(crate) fn push_vessel_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &AccessScope, vessel: &str) {
    qb.push(format!(" AND {vessel}.active = TRUE"));
    if let AccessScope::Assigned(user_id) = scope {
        qb.push(format!(
            " AND EXISTS (SELECT 1 FROM vessel_assignments va \
             WHERE va.vessel_id = {vessel}.id AND va.active = TRUE AND va.user_id = "
        ));
        qb.push_bind(*user_id);
        qb.push(")");
    }
}

/// Traduce violaciones de restricciones conocidas a errores de dominio
pub(crate) fn map_constraint_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.constraint() {
            Some("voyages_one_open_per_vessel") => return invalid_state_error(OPEN_VOYAGE_EXISTS),
            Some("voyages_vessel_id_voy_no_key") => {
                return AppError::Conflict("Voyage number already exists for this vessel".to_string())
            }
            Some("vessels_code_key") => {
                return AppError::Conflict("Vessel code already exists".to_string())
            }
            Some("vessel_assignments_user_id_vessel_id_key") => {
                return AppError::Conflict("User is already assigned to this vessel".to_string())
            }
            _ => {}
        }
    }
    AppError::Database(err)
}
