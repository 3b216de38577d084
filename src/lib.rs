pub mod config;
pub mod enquiries;
pub mod fixtures;
pub mod fomo;
pub mod locations;
pub mod store;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    enquiries::validate::FieldErrors,
    fomo::rotator::RotatorHandle,
    store::{EnquiryStore, FomoStore, LocationStore, StoreError, memory::MemStore},
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub enquiries: Arc<dyn EnquiryStore>,
    pub locations: Arc<dyn LocationStore>,
    pub fomo: Arc<dyn FomoStore>,
    pub rotator: RotatorHandle,
}

impl AppState {
    /// In-memory state seeded from the bundled fixtures, with no rotator
    /// running and no simulated latency. What the test suite runs against.
    pub fn mock() -> anyhow::Result<Self> {
        let store = Arc::new(MemStore::seeded(false)?);
        Ok(Self {
            enquiries: store.clone(),
            locations: store.clone(),
            fomo: store,
            rotator: RotatorHandle::idle(),
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/enquiries", enquiries::router())
        .nest("/locations", locations::router())
        .nest("/fomo-notifications", fomo::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// The `{id}` path segment. A segment that is not an integer gets the same
/// 404 as an id that does not exist, rather than a 400 path rejection.
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound("Record"))?;
        raw.parse()
            .map(Self)
            .map_err(|_| ApiError::NotFound("Record"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("enquiry submission failed")]
    Submission(#[source] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Backend(err) => Self::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{what} not found") })),
            )
                .into_response(),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            Self::Submission(err) => {
                tracing::error!(error = %err, "enquiry submission failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": enquiries::flow::FAILURE_NOTICE })),
                )
                    .into_response()
            }
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
