//! Modelo de usuario y alcance de acceso
//!
//! La identidad llega ya autenticada (token verificado por el middleware);
//! aquí solo vive el rol, el actor de cada operación y el predicado de
//! visibilidad que se compone en todos los repositorios.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::{forbidden_error, validation_error, AppError, AppResult};

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Employee,
    Supervisor,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Supervisor => "SUPERVISOR",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// SUPERVISOR, MANAGER y ADMIN ven toda la flota
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Role::Employee)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPLOYEE" => Ok(Role::Employee),
            "SUPERVISOR" => Ok(Role::Supervisor),
            "MANAGER" => Ok(Role::Manager),
            "ADMIN" => Ok(Role::Admin),
            other => Err(validation_error("role", format!("Unknown role '{}'", other))),
        }
    }
}

/// Usuario que ejecuta la operación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn scope(&self) -> AccessScope {
        AccessScope::for_actor(self)
    }

    /// Falla con Forbidden si el rol no es SUPERVISOR/MANAGER/ADMIN
    pub fn require_privileged(&self, operation: &str) -> AppResult<()> {
        if self.role.is_privileged() {
            Ok(())
        } else {
            Err(forbidden_error(operation, "requires SUPERVISOR, MANAGER or ADMIN role"))
        }
    }

    pub fn require_role(&self, allowed: &[Role], operation: &str) -> AppResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
            Err(forbidden_error(operation, &format!("requires role {}", names.join(" or "))))
        }
    }
}

/// Alcance de visibilidad sobre la cadena vessel -> voyage -> activity -> consumption.
///
/// Todos los lectores filtran además por `active` en cada eslabón; el alcance
/// solo decide si hace falta una asignación activa al buque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Roles privilegiados: cualquier buque activo
    Fleet,
    /// EMPLOYEE: solo buques con asignación activa para este usuario
    Assigned(Uuid),
}

impl AccessScope {
    pub fn for_actor(actor: &Actor) -> Self {
        if actor.role.is_privileged() {
            AccessScope::Fleet
        } else {
            AccessScope::Assigned(actor.id)
        }
    }

    /// Evalúa el predicado contra las asignaciones activas del buque
    pub fn admits<I>(&self, assigned_users: I) -> bool
    where
        I: IntoIterator<Item = Uuid>,
    {
        match self {
            AccessScope::Fleet => true,
            AccessScope::Assigned(user_id) => assigned_users.into_iter().any(|id| id == *user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_and_privilege() {
        for role in [Role::Employee, Role::Supervisor, Role::Manager, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!(!Role::Employee.is_privileged());
        assert!(Role::Supervisor.is_privileged());
        assert!(matches!("employee".parse::<Role>(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_scope_for_employee_requires_assignment() {
        let user = Uuid::new_v4();
        let scope = Actor::new(user, Role::Employee).scope();
        assert_eq!(scope, AccessScope::Assigned(user));
        assert!(scope.admits([Uuid::new_v4(), user]));
        assert!(!scope.admits([Uuid::new_v4()]));
        assert!(AccessScope::Fleet.admits(Vec::<Uuid>::new()));
    }

    #[test]
    fn test_require_role_is_forbidden_for_others() {
        let actor = Actor::new(Uuid::new_v4(), Role::Manager);
        assert!(actor.require_privileged("update voyage").is_ok());
        assert!(matches!(
            actor.require_role(&[Role::Admin], "delete vessel"),
            Err(crate::utils::errors::AppError::Forbidden(_))
        ));
    }
}
