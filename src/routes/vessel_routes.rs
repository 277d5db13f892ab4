use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::vessel_dto::{AssignUserRequest, CreateVesselRequest, UpdateVesselRequest};
use crate::dto::ApiResponse;
use crate::models::{Actor, Vessel, VesselAssignment};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vessel_router() -> Router<AppState> {
    Router::new()
        .route("/vessels", get(list_vessels).post(create_vessel))
        .route(
            "/vessels/:id",
            get(get_vessel).patch(update_vessel).delete(delete_vessel),
        )
        .route(
            "/vessels/:id/assignments",
            get(list_assignments).post(assign_user),
        )
        .route("/vessels/:id/assignments/:user_id", delete(unassign_user))
        .route("/me/vessels", get(my_vessels))
}

async fn list_vessels(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Vessel>>, AppError> {
    let vessels = state.vessels.list(&actor).await?;
    Ok(Json(vessels))
}

async fn get_vessel(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vessel>, AppError> {
    let vessel = state.vessels.get(&actor, id).await?;
    Ok(Json(vessel))
}

async fn create_vessel(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateVesselRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vessel>>), AppError> {
    request.validate()?;

    let vessel = state.vessels.create(&actor, request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(vessel, "Vessel created")),
    ))
}

async fn update_vessel(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVesselRequest>,
) -> Result<Json<ApiResponse<Vessel>>, AppError> {
    request.validate()?;

    let vessel = state.vessels.update(&actor, id, request.into()).await?;
    Ok(Json(ApiResponse::success_with_message(vessel, "Vessel updated")))
}

async fn delete_vessel(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.vessels.remove(&actor, id).await?;
    Ok(Json(ApiResponse::done("Vessel deactivated")))
}

async fn list_assignments(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VesselAssignment>>, AppError> {
    let assignments = state.vessels.assignments(&actor, id).await?;
    Ok(Json(assignments))
}

async fn assign_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VesselAssignment>>), AppError> {
    let assignment = state.vessels.assign(&actor, id, request.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(assignment, "User assigned to vessel")),
    ))
}

async fn unassign_user(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<VesselAssignment>>, AppError> {
    let assignment = state.vessels.unassign(&actor, id, user_id).await?;
    Ok(Json(ApiResponse::success_with_message(assignment, "User unassigned from vessel")))
}

async fn my_vessels(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Vessel>>, AppError> {
    let vessels = state.vessels.my_vessels(&actor).await?;
    Ok(Json(vessels))
}
