use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::consumption_dto::{CreateConsumptionRequest, UpdateConsumptionRequest};
use crate::dto::ApiResponse;
use crate::models::consumption::ConsumptionCreated;
use crate::models::{Actor, Consumption};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_consumption_router() -> Router<AppState> {
    Router::new()
        .route(
            "/activities/:id/consumptions",
            get(list_consumptions).post(create_consumption),
        )
        .route(
            "/consumptions/:id",
            get(get_consumption)
                .patch(update_consumption)
                .delete(delete_consumption),
        )
}

async fn list_consumptions(
    State(state): State<AppState>,
    actor: Actor,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<Vec<Consumption>>, AppError> {
    let consumptions = state.consumptions.list(&actor, activity_id).await?;
    Ok(Json(consumptions))
}

// La respuesta incluye los pares requeridos que aún faltan en la actividad
async fn create_consumption(
    State(state): State<AppState>,
    actor: Actor,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<CreateConsumptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConsumptionCreated>>), AppError> {
    request.validate()?;

    let created = state
        .consumptions
        .create(&actor, activity_id, request.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(created, "Consumption created")),
    ))
}

async fn get_consumption(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Consumption>, AppError> {
    let consumption = state.consumptions.get(&actor, id).await?;
    Ok(Json(consumption))
}

async fn update_consumption(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateConsumptionRequest>,
) -> Result<Json<ApiResponse<Consumption>>, AppError> {
    request.validate()?;

    let consumption = state
        .consumptions
        .update(&actor, id, request.into())
        .await?;
    Ok(Json(ApiResponse::success_with_message(consumption, "Consumption updated")))
}

async fn delete_consumption(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.consumptions.remove(&actor, id).await?;
    Ok(Json(ApiResponse::done("Consumption deleted")))
}
