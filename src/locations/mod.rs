pub mod model;

use std::sync::Arc;

use axum::{
    Json, Router, debug_handler,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{ApiResult, AppState, RecordId, store::LocationStore};
use model::{Location, LocationDraft, LocationPatch};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).patch(update).delete(remove))
}

#[debug_handler]
async fn list(State(store): State<Arc<dyn LocationStore>>) -> ApiResult<Json<Vec<Location>>> {
    Ok(Json(store.all().await?))
}

#[debug_handler]
async fn fetch(
    State(store): State<Arc<dyn LocationStore>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Location>> {
    Ok(Json(store.get(id).await?))
}

#[debug_handler]
async fn create(
    State(store): State<Arc<dyn LocationStore>>,
    Json(draft): Json<LocationDraft>,
) -> ApiResult<(StatusCode, Json<Location>)> {
    Ok((StatusCode::CREATED, Json(store.create(draft).await?)))
}

#[debug_handler]
async fn update(
    State(store): State<Arc<dyn LocationStore>>,
    RecordId(id): RecordId,
    Json(patch): Json<LocationPatch>,
) -> ApiResult<Json<Location>> {
    Ok(Json(store.update(id, patch).await?))
}

#[debug_handler]
async fn remove(
    State(store): State<Arc<dyn LocationStore>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Location>> {
    Ok(Json(store.delete(id).await?))
}
