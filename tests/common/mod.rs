#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use voyage_ledger::config::EnvironmentConfig;
use voyage_ledger::middleware::Claims;
use voyage_ledger::models::vessel::NewVessel;
use voyage_ledger::models::voyage::NewVoyage;
use voyage_ledger::models::{
    Activity, ActivityFields, ActivityType, Actor, ConsumptionCategory, ConsumptionScope,
    ConsumptionUnit, PostingPeriod, Role, Vessel, Voyage,
};
use voyage_ledger::repositories::MemoryRepository;
use voyage_ledger::services::{ActivityDraft, ConsumptionDraft};
use voyage_ledger::state::AppState;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        cors_origins: vec![],
        database_url: None,
    }
}

/// Estado sobre un almacén en memoria vacío
pub fn test_state() -> AppState {
    AppState::new(test_config(), Arc::new(MemoryRepository::new()))
}

pub fn actor(role: Role) -> Actor {
    Actor::new(Uuid::new_v4(), role)
}

pub fn admin() -> Actor {
    actor(Role::Admin)
}

pub fn employee() -> Actor {
    actor(Role::Employee)
}

pub fn bearer(actor: &Actor) -> String {
    let token = encode(
        &Header::default(),
        &Claims::new(actor, 3600),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

pub async fn vessel(state: &AppState, code: &str) -> Vessel {
    state
        .vessels
        .create(
            &admin(),
            NewVessel {
                code: code.to_string(),
                name: format!("MV {}", code),
                vessel_type: Some("CONTAINER".to_string()),
            },
        )
        .await
        .unwrap()
}

pub fn new_voyage(vessel_id: Uuid, voy_no: &str) -> NewVoyage {
    NewVoyage {
        vessel_id,
        voy_no: voy_no.to_string(),
        start_at: at("2025-01-01T00:00:00Z"),
        end_at: Some(at("2025-01-02T00:00:00Z")),
        posting: PostingPeriod::new(2025, 1),
    }
}

pub async fn open_voyage(state: &AppState, vessel_id: Uuid, voy_no: &str) -> Voyage {
    state
        .voyages
        .create(&admin(), new_voyage(vessel_id, voy_no))
        .await
        .unwrap()
}

pub fn activity_draft(kind: ActivityType, fields: ActivityFields) -> ActivityDraft {
    ActivityDraft {
        kind,
        start_at: at("2025-01-01T06:00:00Z"),
        end_at: at("2025-01-01T11:00:00Z"),
        fields,
    }
}

pub fn cargo_fields() -> ActivityFields {
    ActivityFields {
        container_count: Some(120),
        total_container_weight: Some(1800.0),
        fuel_used: Some(300.0),
        ..Default::default()
    }
}

pub async fn activity(state: &AppState, voyage_id: Uuid, kind: ActivityType, fields: ActivityFields) -> Activity {
    state
        .activities
        .create(&admin(), voyage_id, activity_draft(kind, fields))
        .await
        .unwrap()
}

pub fn consumption(
    category: ConsumptionCategory,
    scope: ConsumptionScope,
    unit: ConsumptionUnit,
) -> ConsumptionDraft {
    ConsumptionDraft {
        category,
        scope,
        item_name: "MGO".to_string(),
        quantity: 10.0,
        unit,
        source: None,
        remark: None,
    }
}
