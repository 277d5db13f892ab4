mod common;

use common::*;
use voyage_ledger::models::consumption::ConsumptionChanges;
use voyage_ledger::models::{
    ActivityFields, ActivityType, ConsumptionCategory as Cat, ConsumptionKey, ConsumptionScope as Scope,
    ConsumptionSource, ConsumptionUnit,
};
use voyage_ledger::services::consumption_policy::policy_for;
use voyage_ledger::utils::errors::AppError;

fn fields_for(kind: ActivityType) -> ActivityFields {
    match kind {
        ActivityType::CargoLoad | ActivityType::CargoDischarge => cargo_fields(),
        ActivityType::FullSpeedAway => ActivityFields {
            avg_speed: Some(12.5),
            ..Default::default()
        },
        ActivityType::Other => ActivityFields {
            remark: Some("Drydock survey".to_string()),
            ..Default::default()
        },
        ActivityType::Manoeuvring | ActivityType::Anchoring => ActivityFields::default(),
    }
}

#[tokio::test]
async fn test_fuel_on_reefer_rejected_for_full_speed_away() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let sea = activity(&state, voyage.id, ActivityType::FullSpeedAway, fields_for(ActivityType::FullSpeedAway)).await;

    match state
        .consumptions
        .create(&admin(), sea.id, consumption(Cat::Fuel, Scope::Reefer, ConsumptionUnit::Liter))
        .await
    {
        Err(AppError::PolicyViolation(msg)) => {
            assert!(msg.contains("FULL_SPEED_AWAY"));
            assert!(msg.contains("REEFER"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_reefer_power_in_kwh_allowed_on_cargo_load() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let cargo = activity(&state, voyage.id, ActivityType::CargoLoad, cargo_fields()).await;

    let result = state
        .consumptions
        .create(&admin(), cargo.id, consumption(Cat::Other, Scope::Reefer, ConsumptionUnit::Kwh))
        .await
        .unwrap();
    assert_eq!(result.created.unit, ConsumptionUnit::Kwh);
    assert_eq!(result.created.source, ConsumptionSource::Manual);
    assert_eq!(result.missing_required, vec![ConsumptionKey::new(Cat::Fuel, Scope::Generator)]);

    let covered = state
        .consumptions
        .create(&admin(), cargo.id, consumption(Cat::Fuel, Scope::Generator, ConsumptionUnit::Liter))
        .await
        .unwrap();
    assert!(covered.missing_required.is_empty());
}

#[tokio::test]
async fn test_kwh_cross_rules() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let other = activity(&state, voyage.id, ActivityType::Other, fields_for(ActivityType::Other)).await;

    // OTHER admite cualquier par, pero las reglas de unidad se aplican antes
    let fuel_kwh = state
        .consumptions
        .create(&admin(), other.id, consumption(Cat::Fuel, Scope::Other, ConsumptionUnit::Kwh))
        .await;
    assert!(matches!(fuel_kwh, Err(AppError::PolicyViolation(_))));

    let generator_kwh = state
        .consumptions
        .create(&admin(), other.id, consumption(Cat::Other, Scope::Generator, ConsumptionUnit::Kwh))
        .await;
    assert!(matches!(generator_kwh, Err(AppError::PolicyViolation(_))));
}

#[tokio::test]
async fn test_every_pair_follows_the_table() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;

    for kind in ActivityType::ALL {
        let row = activity(&state, voyage.id, kind, fields_for(kind)).await;
        let policy = policy_for(kind);

        for category in Cat::ALL {
            for scope in Scope::ALL {
                let key = ConsumptionKey::new(category, scope);
                let result = state
                    .consumptions
                    .create(&admin(), row.id, consumption(category, scope, ConsumptionUnit::Liter))
                    .await;

                if policy.allowed.permits(key) {
                    assert!(result.is_ok(), "{kind} should accept {category:?}/{scope:?}");
                } else {
                    assert!(
                        matches!(result, Err(AppError::PolicyViolation(_))),
                        "{kind} should reject {category:?}/{scope:?}"
                    );
                }
            }
        }
    }
}

#[tokio::test]
async fn test_update_is_checked_on_merged_record() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let anchoring = activity(&state, voyage.id, ActivityType::Anchoring, ActivityFields::default()).await;

    let created = state
        .consumptions
        .create(&admin(), anchoring.id, consumption(Cat::Lube, Scope::Generator, ConsumptionUnit::Liter))
        .await
        .unwrap()
        .created;

    // LUBE/MAIN_ENGINE no está permitido en ANCHORING
    let moved = state
        .consumptions
        .update(
            &admin(),
            created.id,
            ConsumptionChanges {
                scope: Some(Scope::MainEngine),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(moved, Err(AppError::PolicyViolation(_))));

    let zero = state
        .consumptions
        .update(
            &admin(),
            created.id,
            ConsumptionChanges {
                quantity: Some(0.0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(zero, Err(AppError::Validation(_))));

    let updated = state
        .consumptions
        .update(
            &admin(),
            created.id,
            ConsumptionChanges {
                quantity: Some(42.0),
                remark: Some("Topped up".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.quantity, 42.0);
    assert_eq!(updated.scope, Scope::Generator);
}

#[tokio::test]
async fn test_soft_deleted_consumption_no_longer_counts() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let anchoring = activity(&state, voyage.id, ActivityType::Anchoring, ActivityFields::default()).await;

    let fuel = state
        .consumptions
        .create(&admin(), anchoring.id, consumption(Cat::Fuel, Scope::Generator, ConsumptionUnit::Liter))
        .await
        .unwrap()
        .created;
    state.consumptions.remove(&admin(), fuel.id).await.unwrap();

    assert!(state.consumptions.list(&admin(), anchoring.id).await.unwrap().is_empty());
    assert!(matches!(
        state.consumptions.get(&admin(), fuel.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        state
            .voyages
            .update_status(&admin(), voyage.id, voyage_ledger::models::VoyageStatus::Closed)
            .await,
        Err(AppError::IncompleteForClose(_))
    ));
}

#[tokio::test]
async fn test_activity_type_is_immutable_and_merge_revalidates() {
    use voyage_ledger::services::ActivityPatch;

    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let cargo = activity(&state, voyage.id, ActivityType::CargoLoad, cargo_fields()).await;

    let retype = state
        .activities
        .update(
            &admin(),
            cargo.id,
            ActivityPatch {
                kind: Some(ActivityType::Anchoring),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(retype, Err(AppError::Validation(_))));

    // omitir campos requeridos ya presentes es válido
    let updated = state
        .activities
        .update(
            &admin(),
            cargo.id,
            ActivityPatch {
                kind: Some(ActivityType::CargoLoad),
                fields: ActivityFields {
                    fuel_used: Some(410.0),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.details.fuel_used(), Some(410.0));
    assert_eq!(updated.details.fields().container_count, Some(120));

    let cleared = state
        .activities
        .update(
            &admin(),
            cargo.id,
            ActivityPatch {
                fields: ActivityFields {
                    container_count: Some(0),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(cleared, Err(AppError::Validation(_))));

    let inverted = state
        .activities
        .update(
            &admin(),
            cargo.id,
            ActivityPatch {
                end_at: Some(at("2025-01-01T05:00:00Z")),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(inverted, Err(AppError::Validation(_))));
}
