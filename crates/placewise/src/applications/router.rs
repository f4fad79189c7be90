use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::http::ApiEnvelope;
use crate::identity::domain::Role;
use crate::identity::service::IdentityService;
use crate::jobs::domain::JobId;
use crate::store::Pagination;

use super::domain::{ApplicationId, ApplicationStatus};
use super::service::{ApplicationLifecycleService, StatusUpdateRequest};

#[derive(Clone)]
pub struct ApplicationRouterState {
    pub identity: Arc<IdentityService>,
    pub applications: Arc<ApplicationLifecycleService>,
}

pub fn application_router(state: ApplicationRouterState) -> Router {
    // POST takes a job id, GET/DELETE an application id; they share the
    // `:id` segment because the router cannot mix parameter names.
    Router::new()
        .route("/api/applications/my", get(my_applications_handler))
        .route("/api/applications/stats/overview", get(stats_handler))
        .route("/api/applications/job/:id", get(job_applications_handler))
        .route(
            "/api/applications/:id",
            get(get_application_handler)
                .post(apply_handler)
                .delete(withdraw_handler),
        )
        .route(
            "/api/applications/:id/status",
            axum::routing::put(update_status_handler),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ApplyRequest {
    #[serde(rename = "coverLetter")]
    cover_letter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JobApplicationParams {
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

async fn apply_handler(
    State(state): State<ApplicationRouterState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    let application = state
        .applications
        .apply(&caller, &JobId(job_id), request.cover_letter)?;
    Ok((
        StatusCode::CREATED,
        ApiEnvelope::data(application).with_message("Application submitted successfully"),
    )
        .into_response())
}

async fn my_applications_handler(
    State(state): State<ApplicationRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    let applications = state.applications.list_mine(&caller.id)?;
    Ok(ApiEnvelope::listing(applications).into_response())
}

async fn job_applications_handler(
    State(state): State<ApplicationRouterState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Query(params): Query<JobApplicationParams>,
) -> Result<Response, ApiError> {
    let caller = state
        .identity
        .authorize(&headers, &[Role::Recruiter, Role::Admin])?;
    let status = parse_status_filter(params.status.as_deref())?;
    let window = Pagination::new(params.page, params.limit);
    let page = state
        .applications
        .list_for_job(&caller, &JobId(job_id), status, window)?;
    Ok(ApiEnvelope::page(page, window).into_response())
}

async fn get_application_handler(
    State(state): State<ApplicationRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[])?;
    let application = state.applications.get(&caller, &ApplicationId(id))?;
    Ok(ApiEnvelope::data(application).into_response())
}

async fn update_status_handler(
    State(state): State<ApplicationRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Response, ApiError> {
    let caller = state
        .identity
        .authorize(&headers, &[Role::Recruiter, Role::Admin])?;
    let application = state
        .applications
        .update_status(&caller, &ApplicationId(id), request)?;
    Ok(ApiEnvelope::data(application)
        .with_message("Application status updated successfully")
        .into_response())
}

async fn withdraw_handler(
    State(state): State<ApplicationRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    state.applications.withdraw(&caller, &ApplicationId(id))?;
    Ok(ApiEnvelope::message("Application withdrawn successfully").into_response())
}

async fn stats_handler(
    State(state): State<ApplicationRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Recruiter])?;
    let stats = state.applications.stats(&caller.id)?;
    Ok(ApiEnvelope::data(stats).into_response())
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<ApplicationStatus>, ApiError> {
    raw.map(|value| {
        value.parse::<ApplicationStatus>().map_err(|_| {
            super::service::ApplicationError::Validation(format!(
                "Unknown application status '{value}'"
            ))
        })
    })
    .transpose()
    .map_err(Into::into)
}
