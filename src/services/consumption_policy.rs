//! Política de consumos por tipo de actividad
//!
//! Tabla estática: para cada tipo, qué pares (category, scope) son
//! obligatorios y cuáles se permiten. Cambiar la política es editar la
//! tabla, no el código de validación.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{
    Activity, ActivityType, Consumption, ConsumptionCategory as Cat, ConsumptionKey,
    ConsumptionScope as Scope, ConsumptionUnit, MissingRequired,
};
use crate::utils::errors::{AppError, AppResult};

/// Conjunto de pares permitidos
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allowed {
    Any,
    Only(&'static [ConsumptionKey]),
}

impl Allowed {
    pub fn permits(&self, key: ConsumptionKey) -> bool {
        match self {
            Allowed::Any => true,
            Allowed::Only(keys) => keys.contains(&key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionPolicy {
    pub required: &'static [ConsumptionKey],
    pub allowed: Allowed,
}

const fn k(category: Cat, scope: Scope) -> ConsumptionKey {
    ConsumptionKey::new(category, scope)
}

const GENERATOR_FUEL: &[ConsumptionKey] = &[k(Cat::Fuel, Scope::Generator)];

const PROPULSION_FUEL: &[ConsumptionKey] = &[
    k(Cat::Fuel, Scope::MainEngine),
    k(Cat::Fuel, Scope::Generator),
];

const CARGO_ALLOWED: &[ConsumptionKey] = &[
    k(Cat::Fuel, Scope::Generator),
    k(Cat::Fuel, Scope::MainEngine),
    k(Cat::Other, Scope::Reefer),
    k(Cat::Lube, Scope::MainEngine),
    k(Cat::Lube, Scope::Generator),
    k(Cat::Water, Scope::Auxiliary),
    k(Cat::Water, Scope::Other),
    k(Cat::Other, Scope::Other),
];

const MANOEUVRING_ALLOWED: &[ConsumptionKey] = &[
    k(Cat::Fuel, Scope::MainEngine),
    k(Cat::Fuel, Scope::Generator),
    k(Cat::Lube, Scope::MainEngine),
    k(Cat::Lube, Scope::Generator),
    k(Cat::Water, Scope::Auxiliary),
    k(Cat::Water, Scope::Other),
    k(Cat::Other, Scope::Other),
];

const FULL_SPEED_AWAY_ALLOWED: &[ConsumptionKey] = &[
    k(Cat::Fuel, Scope::MainEngine),
    k(Cat::Fuel, Scope::Generator),
    k(Cat::Other, Scope::Reefer),
    k(Cat::Lube, Scope::MainEngine),
    k(Cat::Lube, Scope::Generator),
    k(Cat::Water, Scope::Auxiliary),
    k(Cat::Water, Scope::Other),
    k(Cat::Other, Scope::Other),
];

const ANCHORING_ALLOWED: &[ConsumptionKey] = &[
    k(Cat::Fuel, Scope::Generator),
    k(Cat::Other, Scope::Reefer),
    k(Cat::Lube, Scope::Generator),
    k(Cat::Water, Scope::Auxiliary),
    k(Cat::Water, Scope::Other),
    k(Cat::Other, Scope::Other),
];

const OTHER_POLICY: ConsumptionPolicy = ConsumptionPolicy {
    required: &[],
    allowed: Allowed::Any,
};

pub static POLICY_TABLE: [(ActivityType, ConsumptionPolicy); 6] = [
    (
        ActivityType::CargoLoad,
        ConsumptionPolicy {
            required: GENERATOR_FUEL,
            allowed: Allowed::Only(CARGO_ALLOWED),
        },
    ),
    (
        ActivityType::CargoDischarge,
        ConsumptionPolicy {
            required: GENERATOR_FUEL,
            allowed: Allowed::Only(CARGO_ALLOWED),
        },
    ),
    (
        ActivityType::Manoeuvring,
        ConsumptionPolicy {
            required: PROPULSION_FUEL,
            allowed: Allowed::Only(MANOEUVRING_ALLOWED),
        },
    ),
    (
        ActivityType::FullSpeedAway,
        ConsumptionPolicy {
            required: PROPULSION_FUEL,
            allowed: Allowed::Only(FULL_SPEED_AWAY_ALLOWED),
        },
    ),
    (
        ActivityType::Anchoring,
        ConsumptionPolicy {
            required: GENERATOR_FUEL,
            allowed: Allowed::Only(ANCHORING_ALLOWED),
        },
    ),
    (ActivityType::Other, OTHER_POLICY),
];

pub fn policy_for(kind: ActivityType) -> &'static ConsumptionPolicy {
    POLICY_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, policy)| policy)
        .unwrap_or(&OTHER_POLICY)
}

/// Reglas transversales, previas a la tabla
pub fn enforce_common_rules(key: ConsumptionKey, unit: ConsumptionUnit) -> AppResult<()> {
    if key.category == Cat::Fuel && unit == ConsumptionUnit::Kwh {
        return Err(AppError::PolicyViolation("FUEL cannot use unit KWH".to_string()));
    }
    if unit == ConsumptionUnit::Kwh && !matches!(key.scope, Scope::Reefer | Scope::Other) {
        return Err(AppError::PolicyViolation(
            "KWH unit must use scope REEFER or OTHER".to_string(),
        ));
    }
    Ok(())
}

/// Valida un consumo (ya mergeado en updates) contra la política del tipo
pub fn enforce_policy(kind: ActivityType, key: ConsumptionKey, unit: ConsumptionUnit) -> AppResult<()> {
    enforce_common_rules(key, unit)?;

    if !policy_for(kind).allowed.permits(key) {
        return Err(AppError::PolicyViolation(format!(
            "Consumption not allowed for activity type {} (category={}, scope={})",
            kind,
            key.category.as_str(),
            key.scope.as_str()
        )));
    }
    Ok(())
}

/// Pares obligatorios sin ningún consumo activo que los cubra, en el orden de la tabla
pub fn compute_missing_required<'a, I>(policy: &ConsumptionPolicy, consumptions: I) -> Vec<ConsumptionKey>
where
    I: IntoIterator<Item = &'a Consumption>,
{
    if policy.required.is_empty() {
        return Vec::new();
    }
    let present: Vec<ConsumptionKey> = consumptions
        .into_iter()
        .filter(|c| c.active)
        .map(Consumption::key)
        .collect();

    policy
        .required
        .iter()
        .filter(|need| !present.contains(need))
        .copied()
        .collect()
}

/// Chequeo previo al cierre: cada actividad activa se evalúa por separado
/// sobre una única lectura de consumos del voyage.
pub fn close_shortfalls(activities: &[Activity], consumptions: &[Consumption]) -> Vec<MissingRequired> {
    let mut by_activity: HashMap<Uuid, Vec<&Consumption>> = HashMap::new();
    for consumption in consumptions.iter().filter(|c| c.active) {
        by_activity.entry(consumption.activity_id).or_default().push(consumption);
    }

    activities
        .iter()
        .filter(|a| a.active)
        .filter_map(|activity| {
            let policy = policy_for(activity.kind());
            let present = by_activity.get(&activity.id).map(Vec::as_slice).unwrap_or(&[]);
            let missing = compute_missing_required(policy, present.iter().copied());
            (!missing.is_empty()).then(|| MissingRequired {
                activity_id: activity.id,
                activity_type: activity.kind(),
                missing,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{ActivityDetails, EngineLog};
    use crate::models::ConsumptionSource;
    use chrono::{Duration, Utc};

    fn consumption(activity_id: Uuid, category: Cat, scope: Scope, active: bool) -> Consumption {
        Consumption {
            id: Uuid::new_v4(),
            activity_id,
            category,
            scope,
            item_name: "MGO".to_string(),
            quantity: 10.0,
            unit: ConsumptionUnit::Liter,
            source: ConsumptionSource::Manual,
            remark: None,
            active,
            created_by_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn manoeuvring(id: Uuid) -> Activity {
        let start = Utc::now();
        Activity {
            id,
            voyage_id: Uuid::new_v4(),
            start_at: start,
            end_at: start + Duration::hours(1),
            year: 2025,
            month: 1,
            details: ActivityDetails::Manoeuvring(EngineLog::default()),
            active: true,
            created_by_id: Uuid::new_v4(),
            created_at: start,
        }
    }

    #[test]
    fn test_table_covers_every_activity_type() {
        for kind in ActivityType::ALL {
            assert!(POLICY_TABLE.iter().any(|(k, _)| *k == kind), "{kind} missing");
            let policy = policy_for(kind);
            for need in policy.required {
                assert!(policy.allowed.permits(*need), "{kind} requires {need} but forbids it");
            }
        }
        assert_eq!(policy_for(ActivityType::Other).allowed, Allowed::Any);
    }

    #[test]
    fn test_policy_round_trip_with_liters() {
        for kind in ActivityType::ALL {
            let policy = policy_for(kind);
            for category in Cat::ALL {
                for scope in Scope::ALL {
                    let key = ConsumptionKey::new(category, scope);
                    let result = enforce_policy(kind, key, ConsumptionUnit::Liter);
                    if policy.allowed.permits(key) {
                        assert!(result.is_ok(), "{kind} should allow {key}");
                    } else {
                        assert!(
                            matches!(result, Err(AppError::PolicyViolation(_))),
                            "{kind} should reject {key}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_fuel_reefer_rejected_on_full_speed_away() {
        let err = enforce_policy(
            ActivityType::FullSpeedAway,
            k(Cat::Fuel, Scope::Reefer),
            ConsumptionUnit::Liter,
        )
        .unwrap_err();
        match err {
            AppError::PolicyViolation(msg) => {
                assert!(msg.contains("FULL_SPEED_AWAY"));
                assert!(msg.contains("category=FUEL"));
                assert!(msg.contains("scope=REEFER"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_kwh_rules() {
        assert!(enforce_policy(ActivityType::CargoLoad, k(Cat::Other, Scope::Reefer), ConsumptionUnit::Kwh).is_ok());
        assert!(enforce_common_rules(k(Cat::Fuel, Scope::Reefer), ConsumptionUnit::Kwh).is_err());
        assert!(enforce_common_rules(k(Cat::Other, Scope::Generator), ConsumptionUnit::Kwh).is_err());
        // la regla transversal aplica incluso con allowed = ANY
        assert!(enforce_policy(ActivityType::Other, k(Cat::Fuel, Scope::Other), ConsumptionUnit::Kwh).is_err());
    }

    #[test]
    fn test_missing_required_ignores_inactive() {
        let activity_id = Uuid::new_v4();
        let policy = policy_for(ActivityType::Manoeuvring);
        let list = vec![
            consumption(activity_id, Cat::Fuel, Scope::Generator, true),
            consumption(activity_id, Cat::Fuel, Scope::MainEngine, false),
        ];
        assert_eq!(
            compute_missing_required(policy, &list),
            vec![k(Cat::Fuel, Scope::MainEngine)]
        );
        assert!(compute_missing_required(policy_for(ActivityType::Other), &list).is_empty());
    }

    #[test]
    fn test_close_shortfalls_reports_each_activity() {
        let complete = manoeuvring(Uuid::new_v4());
        let partial = manoeuvring(Uuid::new_v4());
        let consumptions = vec![
            consumption(complete.id, Cat::Fuel, Scope::MainEngine, true),
            consumption(complete.id, Cat::Fuel, Scope::Generator, true),
            consumption(partial.id, Cat::Fuel, Scope::Generator, true),
        ];

        let problems = close_shortfalls(&[complete, partial.clone()], &consumptions);
        assert_eq!(
            problems,
            vec![MissingRequired {
                activity_id: partial.id,
                activity_type: ActivityType::Manoeuvring,
                missing: vec![k(Cat::Fuel, Scope::MainEngine)],
            }]
        );
    }
}
