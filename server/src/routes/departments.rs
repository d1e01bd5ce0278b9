use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use entity::department;
use platform_api::{ApiError, ApiResult, Message, deleted_ack, updated_ack};
use platform_db::departments::{self, DepartmentDraft};
use tracing::{info, instrument};

use super::parse_id;
use crate::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/random", get(random))
        .route("/{id}", get(get_by_id).put(update_by_id).delete(delete_by_id))
}

#[instrument(name = "departments.list", skip_all)]
async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<department::Model>>> {
    Ok(Json(departments::find_all(&state.pool).await?))
}

#[instrument(name = "departments.random", skip_all)]
async fn random(State(state): State<AppState>) -> ApiResult<Json<department::Model>> {
    departments::random(&state.pool)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

#[instrument(name = "departments.get", skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<department::Model>> {
    let id = parse_id(&id).ok_or_else(ApiError::not_found)?;
    departments::find_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

#[instrument(name = "departments.create", skip_all)]
async fn create(
    State(state): State<AppState>,
    Json(draft): Json<DepartmentDraft>,
) -> ApiResult<Json<Message>> {
    let fields = draft.validate()?;
    let created = departments::insert(&state.pool, fields).await?;
    info!(id = %created.id, "department created");
    Ok(Json(Message::ok()))
}

#[instrument(name = "departments.update", skip(state, draft))]
async fn update_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<DepartmentDraft>,
) -> ApiResult<Json<Message>> {
    let id = parse_id(&id).ok_or_else(ApiError::not_found_for_write)?;
    if departments::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found_for_write());
    }
    let fields = draft.validate()?;
    departments::replace(&state.pool, id, fields).await?;
    let all = departments::find_all(&state.pool).await?;
    Ok(Json(updated_ack(&all)?))
}

#[instrument(name = "departments.delete", skip(state))]
async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = parse_id(&id).ok_or_else(ApiError::not_found_for_write)?;
    let Some(deleted) = departments::find_by_id(&state.pool, id).await? else {
        return Err(ApiError::not_found_for_write());
    };
    departments::delete_by_id(&state.pool, id).await?;
    info!(%id, "department deleted");
    let remaining = departments::find_all(&state.pool).await?;
    Ok(Json(deleted_ack(&deleted, &remaining)?))
}
