mod common;

use common::*;
use voyage_ledger::models::vessel::VesselChanges;
use voyage_ledger::models::{ActivityType, Role};
use voyage_ledger::utils::errors::AppError;

#[tokio::test]
async fn test_unassigned_voyage_reads_as_not_found() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let v2 = vessel(&state, "V2").await;
    let foreign = open_voyage(&state, v2.id, "200").await;

    let crew = employee();
    state.vessels.assign(&admin(), v1.id, crew.id).await.unwrap();

    match state.voyages.get(&crew, foreign.id).await {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Voyage not found"),
        other => panic!("unexpected result {other:?}"),
    }
    // mismo resultado que para un id inexistente
    match state.voyages.get(&crew, uuid::Uuid::new_v4()).await {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Voyage not found"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_children_of_unassigned_vessels_are_hidden() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let cargo = activity(&state, voyage.id, ActivityType::CargoLoad, cargo_fields()).await;

    let outsider = employee();
    assert!(matches!(
        state.activities.get(&outsider, cargo.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        state.activities.list(&outsider, voyage.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        state.fuel.ledger(&outsider, voyage.id).await,
        Err(AppError::NotFound(_))
    ));

    state.vessels.assign(&admin(), v1.id, outsider.id).await.unwrap();
    assert_eq!(state.activities.get(&outsider, cargo.id).await.unwrap().id, cargo.id);
}

#[tokio::test]
async fn test_vessel_listing_is_scoped() {
    let state = test_state();
    let alpha = vessel(&state, "ALPHA").await;
    vessel(&state, "BRAVO").await;

    let crew = employee();
    state.vessels.assign(&admin(), alpha.id, crew.id).await.unwrap();

    let all = state.vessels.list(&actor(Role::Supervisor)).await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = state.vessels.list(&crew).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, alpha.id);
    assert_eq!(state.vessels.my_vessels(&crew).await.unwrap(), mine);

    state.vessels.unassign(&admin(), alpha.id, crew.id).await.unwrap();
    assert!(state.vessels.list(&crew).await.unwrap().is_empty());
    assert!(matches!(
        state.vessels.get(&crew, alpha.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_deactivated_vessel_hides_its_voyages() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;

    state.vessels.remove(&admin(), v1.id).await.unwrap();

    assert!(matches!(
        state.voyages.get(&admin(), voyage.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(state.vessels.list(&admin()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_role_gates() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let voyage = open_voyage(&state, v1.id, "001").await;
    let crew = employee();
    state.vessels.assign(&admin(), v1.id, crew.id).await.unwrap();

    assert!(matches!(
        state.voyages.remove(&crew, voyage.id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        state
            .vessels
            .update(&crew, v1.id, VesselChanges { name: Some("Renamed".into()), ..Default::default() })
            .await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        state.vessels.remove(&actor(Role::Manager), v1.id).await,
        Err(AppError::Forbidden(_))
    ));

    // las actividades están abiertas a todos los roles con acceso
    let anchoring = state
        .activities
        .create(
            &crew,
            voyage.id,
            activity_draft(ActivityType::Anchoring, Default::default()),
        )
        .await
        .unwrap();
    assert_eq!(anchoring.created_by_id, crew.id);
}

#[tokio::test]
async fn test_assignment_lifecycle() {
    let state = test_state();
    let v1 = vessel(&state, "V1").await;
    let user_id = uuid::Uuid::new_v4();

    state.vessels.assign(&admin(), v1.id, user_id).await.unwrap();
    assert!(matches!(
        state.vessels.assign(&admin(), v1.id, user_id).await,
        Err(AppError::Conflict(_))
    ));

    let revoked = state.vessels.unassign(&admin(), v1.id, user_id).await.unwrap();
    assert!(!revoked.active);
    assert!(matches!(
        state.vessels.unassign(&admin(), v1.id, user_id).await,
        Err(AppError::NotFound(_))
    ));

    // reasignar reactiva la misma fila
    let restored = state.vessels.assign(&admin(), v1.id, user_id).await.unwrap();
    assert_eq!(restored.id, revoked.id);
    assert!(restored.active);
    assert_eq!(state.vessels.assignments(&admin(), v1.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_vessel_code_conflicts() {
    let state = test_state();
    vessel(&state, "V1").await;

    let err = state
        .vessels
        .create(
            &admin(),
            voyage_ledger::models::vessel::NewVessel {
                code: "V1".to_string(),
                name: "Other".to_string(),
                vessel_type: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
