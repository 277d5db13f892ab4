mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use voyage_ledger::build_router;
use voyage_ledger::models::Actor;

async fn send(app: &Router, method: &str, uri: &str, actor: Option<&Actor>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(header::AUTHORIZATION, bearer(actor));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Buque + voyage abierto creados por HTTP; devuelve (vessel_id, voyage_id)
async fn seed(app: &Router, boss: &Actor) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/vessels",
        Some(boss),
        Some(json!({ "code": "V1", "name": "MV Aurora", "type": "CONTAINER" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let vessel_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        "POST",
        &format!("/api/vessels/{}/voyages", vessel_id),
        Some(boss),
        Some(json!({
            "voyNo": "001",
            "startAt": "2025-01-01T00:00:00Z",
            "endAt": "2025-01-02T00:00:00Z",
            "postingYear": 2025,
            "postingMonth": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "OPEN");
    let voyage_id = body["data"]["id"].as_str().unwrap().to_string();

    (vessel_id, voyage_id)
}

#[tokio::test]
async fn test_health_check() {
    let app = build_router(test_state());
    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "voyage_ledger");
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = build_router(test_state());
    let (status, body) = send(&app, "GET", "/api/vessels", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_voyage_close_flow_over_http() {
    let app = build_router(test_state());
    let boss = admin();
    let (_, voyage_id) = seed(&app, &boss).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/voyages/{}/activities", voyage_id),
        Some(&boss),
        Some(json!({
            "type": "CARGO_LOAD",
            "startAt": "2025-01-01T06:00:00Z",
            "endAt": "2025-01-01T11:00:00Z",
            "containerCount": 120,
            "totalContainerWeight": 1800,
            "fuelUsed": 300
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "CARGO_LOAD");
    assert_eq!(body["data"]["containerCount"], 120);
    assert_eq!(body["data"]["year"], 2025);
    let activity_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/voyages/{}/status", voyage_id),
        Some(&boss),
        Some(json!({ "status": "CLOSED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INCOMPLETE_FOR_CLOSE");
    assert_eq!(body["details"][0]["activityId"], activity_id.as_str());
    assert_eq!(body["details"][0]["missing"][0]["category"], "FUEL");
    assert_eq!(body["details"][0]["missing"][0]["scope"], "GENERATOR");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/activities/{}/consumptions", activity_id),
        Some(&boss),
        Some(json!({
            "category": "FUEL",
            "scope": "GENERATOR",
            "itemName": "MGO",
            "quantity": 2.5,
            "unit": "TON"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created"]["source"], "MANUAL");
    assert_eq!(body["data"]["missingRequired"], json!([]));

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/voyages/{}/status", voyage_id),
        Some(&boss),
        Some(json!({ "status": "CLOSED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CLOSED");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/voyages/{}/status", voyage_id),
        Some(&boss),
        Some(json!({ "status": "CLOSED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_policy_violation_and_request_validation() {
    let app = build_router(test_state());
    let boss = admin();
    let (_, voyage_id) = seed(&app, &boss).await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/voyages/{}/activities", voyage_id),
        Some(&boss),
        Some(json!({
            "type": "FULL_SPEED_AWAY",
            "startAt": "2025-01-01T06:00:00Z",
            "endAt": "2025-01-01T11:00:00Z",
            "avgSpeed": 12.5
        })),
    )
    .await;
    let activity_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/activities/{}/consumptions", activity_id);

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&boss),
        Some(json!({
            "category": "FUEL",
            "scope": "REEFER",
            "itemName": "MGO",
            "quantity": 1.0,
            "unit": "LITER"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "POLICY_VIOLATION");

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&boss),
        Some(json!({
            "category": "WATER",
            "scope": "GENERATOR",
            "itemName": "Fresh water",
            "quantity": 1.0,
            "unit": "TON"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // campos desconocidos se rechazan en la deserialización
    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&boss),
        Some(json!({
            "category": "FUEL",
            "scope": "MAIN_ENGINE",
            "itemName": "MGO",
            "quantity": 1.0,
            "unit": "LITER",
            "voyageId": voyage_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_employee_sees_only_assigned_vessels() {
    let app = build_router(test_state());
    let boss = admin();
    let (vessel_id, voyage_id) = seed(&app, &boss).await;
    let crew = employee();

    let (status, body) = send(&app, "GET", &format!("/api/voyages/{}", voyage_id), Some(&crew), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Voyage not found");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/vessels/{}/assignments", vessel_id),
        Some(&boss),
        Some(json!({ "userId": crew.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", &format!("/api/voyages/{}", voyage_id), Some(&crew), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vessel"]["code"], "V1");
    assert_eq!(body["voyNo"], "001");

    let (status, body) = send(&app, "GET", "/api/me/vessels", Some(&crew), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, "DELETE", &format!("/api/voyages/{}", voyage_id), Some(&crew), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_fuel_endpoints() {
    let app = build_router(test_state());
    let boss = admin();
    let (_, voyage_id) = seed(&app, &boss).await;
    let base = format!("/api/voyages/{}/fuel-consumption", voyage_id);

    let (status, body) = send(&app, "PATCH", &format!("{}/rob", base), Some(&boss), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("{}/rob", base),
        Some(&boss),
        Some(json!({ "openingRob": 5000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("{}/bunkers", base),
        Some(&boss),
        Some(json!({ "at": "2025-01-01T03:00:00Z", "amount": 750 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bunker_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &base, Some(&boss), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rob"]["openingRob"], 5000.0);
    assert_eq!(body["rob"]["closingRob"], 0.0);
    assert_eq!(body["bunkers"][0]["amount"], 750.0);
    assert_eq!(body["computed"]["consumedFromActivities"], 0.0);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/fuel-consumption/bunkers/{}", bunker_id),
        Some(&boss),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
