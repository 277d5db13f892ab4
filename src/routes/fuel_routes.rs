use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::fuel_dto::{CreateBunkerRequest, UpdateBunkerRequest, UpdateRobRequest};
use crate::dto::ApiResponse;
use crate::models::{Actor, FuelBunkerEvent, FuelLedger, FuelRob};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_router() -> Router<AppState> {
    Router::new()
        .route("/voyages/:id/fuel-consumption", get(get_ledger))
        .route("/voyages/:id/fuel-consumption/rob", patch(update_rob))
        .route("/voyages/:id/fuel-consumption/bunkers", post(create_bunker))
        .route(
            "/fuel-consumption/bunkers/:id",
            patch(update_bunker).delete(delete_bunker),
        )
}

async fn get_ledger(
    State(state): State<AppState>,
    actor: Actor,
    Path(voyage_id): Path<Uuid>,
) -> Result<Json<FuelLedger>, AppError> {
    let ledger = state.fuel.ledger(&actor, voyage_id).await?;
    Ok(Json(ledger))
}

async fn update_rob(
    State(state): State<AppState>,
    actor: Actor,
    Path(voyage_id): Path<Uuid>,
    Json(request): Json<UpdateRobRequest>,
) -> Result<Json<ApiResponse<FuelRob>>, AppError> {
    request.validate()?;

    let rob = state
        .fuel
        .upsert_rob(&actor, voyage_id, request.opening_rob, request.closing_rob)
        .await?;
    Ok(Json(ApiResponse::success_with_message(rob, "ROB updated")))
}

async fn create_bunker(
    State(state): State<AppState>,
    actor: Actor,
    Path(voyage_id): Path<Uuid>,
    Json(request): Json<CreateBunkerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FuelBunkerEvent>>), AppError> {
    request.validate()?;

    let bunker = state
        .fuel
        .create_bunker(&actor, voyage_id, request.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(bunker, "Bunker event created")),
    ))
}

async fn update_bunker(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBunkerRequest>,
) -> Result<Json<ApiResponse<FuelBunkerEvent>>, AppError> {
    request.validate()?;

    let bunker = state.fuel.update_bunker(&actor, id, request.into()).await?;
    Ok(Json(ApiResponse::success_with_message(bunker, "Bunker event updated")))
}

async fn delete_bunker(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.fuel.delete_bunker(&actor, id).await?;
    Ok(Json(ApiResponse::done("Bunker event deleted")))
}
