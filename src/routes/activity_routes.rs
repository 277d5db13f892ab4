use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::activity_dto::{CreateActivityRequest, UpdateActivityRequest};
use crate::dto::ApiResponse;
use crate::models::{Activity, Actor};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_activity_router() -> Router<AppState> {
    Router::new()
        .route(
            "/voyages/:id/activities",
            get(list_activities).post(create_activity),
        )
        .route(
            "/activities/:id",
            get(get_activity).patch(update_activity).delete(delete_activity),
        )
}

async fn list_activities(
    State(state): State<AppState>,
    actor: Actor,
    Path(voyage_id): Path<Uuid>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let activities = state.activities.list(&actor, voyage_id).await?;
    Ok(Json(activities))
}

async fn create_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(voyage_id): Path<Uuid>,
    Json(request): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Activity>>), AppError> {
    request.validate()?;

    let activity = state
        .activities
        .create(&actor, voyage_id, request.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(activity, "Activity created")),
    ))
}

async fn get_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Activity>, AppError> {
    let activity = state.activities.get(&actor, id).await?;
    Ok(Json(activity))
}

async fn update_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateActivityRequest>,
) -> Result<Json<ApiResponse<Activity>>, AppError> {
    request.validate()?;

    let activity = state.activities.update(&actor, id, request.into()).await?;
    Ok(Json(ApiResponse::success_with_message(activity, "Activity updated")))
}

async fn delete_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.activities.remove(&actor, id).await?;
    Ok(Json(ApiResponse::done("Activity deleted")))
}
