use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::voyage_dto::{
    CreateVoyageRequest, ListVoyagesQuery, UpdatePostingRequest, UpdateVoyageRequest,
    UpdateVoyageStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::voyage::VoyageDetail;
use crate::models::{Actor, Voyage};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_voyage_router() -> Router<AppState> {
    Router::new()
        .route("/vessels/:id/voyages", get(list_voyages).post(create_voyage))
        .route(
            "/voyages/:id",
            get(get_voyage).patch(update_voyage).delete(delete_voyage),
        )
        .route("/voyages/:id/status", patch(update_status))
        .route("/voyages/:id/posting", patch(update_posting))
}

async fn list_voyages(
    State(state): State<AppState>,
    actor: Actor,
    Path(vessel_id): Path<Uuid>,
    Query(query): Query<ListVoyagesQuery>,
) -> Result<Json<Vec<Voyage>>, AppError> {
    query.validate()?;

    let voyages = state
        .voyages
        .list_by_vessel(&actor, vessel_id, query.into())
        .await?;
    Ok(Json(voyages))
}

async fn create_voyage(
    State(state): State<AppState>,
    actor: Actor,
    Path(vessel_id): Path<Uuid>,
    Json(request): Json<CreateVoyageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Voyage>>), AppError> {
    request.validate()?;

    let voyage = state
        .voyages
        .create(&actor, request.into_new_voyage(vessel_id))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(voyage, "Voyage created")),
    ))
}

async fn get_voyage(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<VoyageDetail>, AppError> {
    let voyage = state.voyages.get(&actor, id).await?;
    Ok(Json(voyage))
}

async fn update_voyage(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVoyageRequest>,
) -> Result<Json<ApiResponse<Voyage>>, AppError> {
    request.validate()?;

    let voyage = state.voyages.update(&actor, id, request.into()).await?;
    Ok(Json(ApiResponse::success_with_message(voyage, "Voyage updated")))
}

// Transición OPEN -> CLOSED; falla con el detalle de faltantes si la voyage está incompleta
async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVoyageStatusRequest>,
) -> Result<Json<ApiResponse<Voyage>>, AppError> {
    let voyage = state
        .voyages
        .update_status(&actor, id, request.status)
        .await?;
    Ok(Json(ApiResponse::success_with_message(voyage, "Voyage status updated")))
}

async fn update_posting(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePostingRequest>,
) -> Result<Json<ApiResponse<Voyage>>, AppError> {
    request.validate()?;

    let voyage = state
        .voyages
        .update_posting(&actor, id, request.period())
        .await?;
    Ok(Json(ApiResponse::success_with_message(voyage, "Posting period updated")))
}

async fn delete_voyage(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.voyages.remove(&actor, id).await?;
    Ok(Json(ApiResponse::done("Voyage deleted")))
}
