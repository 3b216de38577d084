pub mod flow;
pub mod model;
pub mod validate;

use std::sync::Arc;

use axum::{
    Json, Router, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    ApiError, ApiResult, AppState, RecordId,
    store::EnquiryStore,
};
use flow::{LeadForm, Outcome};
use model::{Enquiry, EnquiryForm, EnquiryPatch};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(submit))
        .route("/{id}", get(fetch).patch(update).delete(remove))
}

#[debug_handler]
async fn list(State(store): State<Arc<dyn EnquiryStore>>) -> ApiResult<Json<Vec<Enquiry>>> {
    Ok(Json(store.all().await?))
}

#[debug_handler]
async fn fetch(
    State(store): State<Arc<dyn EnquiryStore>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Enquiry>> {
    Ok(Json(store.get(id).await?))
}

/// Runs the whole submission pipeline: validation errors come back as 422
/// with the field error map, a store failure as 502 with the generic retry
/// copy, success as 201 with the created record and the notice the UI
/// toasts.
#[debug_handler]
async fn submit(
    State(store): State<Arc<dyn EnquiryStore>>,
    Json(form): Json<EnquiryForm>,
) -> ApiResult<Response> {
    let mut lead = LeadForm::new(form.kind, form.fields);
    match lead.submit(store.as_ref()).await {
        Outcome::Submitted { enquiry, notice } => Ok((
            StatusCode::CREATED,
            Json(json!({ "enquiry": enquiry, "message": notice })),
        )
            .into_response()),
        Outcome::Rejected(errors) => Err(ApiError::Validation(errors)),
        Outcome::Failed(err) => Err(ApiError::Submission(err)),
        // a fresh form per request cannot already be in flight
        Outcome::InFlight => Err(ApiError::Internal(anyhow::anyhow!(
            "submission already in flight"
        ))),
    }
}

#[debug_handler]
async fn update(
    State(store): State<Arc<dyn EnquiryStore>>,
    RecordId(id): RecordId,
    Json(patch): Json<EnquiryPatch>,
) -> ApiResult<Json<Enquiry>> {
    Ok(Json(store.update(id, patch).await?))
}

#[debug_handler]
async fn remove(
    State(store): State<Arc<dyn EnquiryStore>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Enquiry>> {
    Ok(Json(store.delete(id).await?))
}
