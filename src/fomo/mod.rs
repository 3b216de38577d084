pub mod model;
pub mod rotator;

use std::sync::Arc;

use axum::{
    Json, Router, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{ApiResult, AppState, RecordId, store::FomoStore};
use model::{FomoDraft, FomoNotification, FomoPatch};
use rotator::RotatorHandle;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/active", get(active))
        .route("/current", get(current))
        .route("/{id}", get(fetch).patch(update).delete(remove))
}

#[debug_handler]
async fn list(State(store): State<Arc<dyn FomoStore>>) -> ApiResult<Json<Vec<FomoNotification>>> {
    Ok(Json(store.all().await?))
}

#[debug_handler]
async fn active(
    State(store): State<Arc<dyn FomoStore>>,
) -> ApiResult<Json<Vec<FomoNotification>>> {
    Ok(Json(store.active().await?))
}

/// What the rotator is showing right now; 204 while nothing is visible.
#[debug_handler]
async fn current(State(rotator): State<RotatorHandle>) -> Response {
    match rotator.current() {
        Some(notification) => Json(notification).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[debug_handler]
async fn fetch(
    State(store): State<Arc<dyn FomoStore>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<FomoNotification>> {
    Ok(Json(store.get(id).await?))
}

#[debug_handler]
async fn create(
    State(store): State<Arc<dyn FomoStore>>,
    Json(draft): Json<FomoDraft>,
) -> ApiResult<(StatusCode, Json<FomoNotification>)> {
    Ok((StatusCode::CREATED, Json(store.create(draft).await?)))
}

#[debug_handler]
async fn update(
    State(store): State<Arc<dyn FomoStore>>,
    RecordId(id): RecordId,
    Json(patch): Json<FomoPatch>,
) -> ApiResult<Json<FomoNotification>> {
    Ok(Json(store.update(id, patch).await?))
}

#[debug_handler]
async fn remove(
    State(store): State<Arc<dyn FomoStore>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<FomoNotification>> {
    Ok(Json(store.delete(id).await?))
}
