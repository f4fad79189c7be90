use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::error::ApiError;
use crate::http::ApiEnvelope;
use crate::identity::domain::Role;
use crate::identity::service::IdentityService;
use crate::jobs::domain::JobId;

use super::service::SavedJobService;

#[derive(Clone)]
pub struct SavedJobRouterState {
    pub identity: Arc<IdentityService>,
    pub saved_jobs: Arc<SavedJobService>,
}

pub fn saved_job_router(state: SavedJobRouterState) -> Router {
    Router::new()
        .route("/api/saved-jobs", get(list_saved_handler))
        .route("/api/saved-jobs/check/:job_id", get(check_saved_handler))
        .route(
            "/api/saved-jobs/:job_id",
            axum::routing::post(save_handler).delete(unsave_handler),
        )
        .with_state(state)
}

async fn save_handler(
    State(state): State<SavedJobRouterState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    let saved = state.saved_jobs.save(&caller.id, &JobId(job_id))?;
    Ok((
        StatusCode::CREATED,
        ApiEnvelope::data(saved).with_message("Job saved successfully"),
    )
        .into_response())
}

async fn list_saved_handler(
    State(state): State<SavedJobRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    let saved = state.saved_jobs.list(&caller.id)?;
    Ok(ApiEnvelope::listing(saved).into_response())
}

async fn unsave_handler(
    State(state): State<SavedJobRouterState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    state.saved_jobs.unsave(&caller.id, &JobId(job_id))?;
    Ok(ApiEnvelope::message("Job removed from saved list").into_response())
}

async fn check_saved_handler(
    State(state): State<SavedJobRouterState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    let saved = state.saved_jobs.is_saved(&caller.id, &JobId(job_id))?;
    Ok(ApiEnvelope::data(json!({ "isSaved": saved })).into_response())
}
