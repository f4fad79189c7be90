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
use crate::store::Pagination;

use super::domain::{JobId, JobSearchQuery};
use super::service::{JobCatalogService, JobDraft, JobError, JobUpdate};

#[derive(Clone)]
pub struct JobRouterState {
    pub identity: Arc<IdentityService>,
    pub jobs: Arc<JobCatalogService>,
}

pub fn job_router(state: JobRouterState) -> Router {
    Router::new()
        .route("/api/jobs", get(search_jobs_handler).post(create_job_handler))
        .route("/api/jobs/my/jobs", get(my_jobs_handler))
        .route("/api/jobs/recommended", get(recommended_jobs_handler))
        .route(
            "/api/jobs/:id",
            get(get_job_handler)
                .put(update_job_handler)
                .delete(delete_job_handler),
        )
        .with_state(state)
}

/// Query-string form of [`JobSearchQuery`] plus the paging window.
#[derive(Debug, Default, Deserialize)]
pub struct JobSearchParams {
    pub search: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "jobType")]
    pub job_type: Option<String>,
    #[serde(rename = "experienceLevel")]
    pub experience_level: Option<String>,
    #[serde(rename = "minSalary")]
    pub min_salary: Option<u64>,
    #[serde(rename = "maxSalary")]
    pub max_salary: Option<u64>,
    pub skills: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl JobSearchParams {
    fn into_query(self) -> Result<(JobSearchQuery, Pagination), JobError> {
        let job_type = self
            .job_type
            .map(|raw| {
                raw.parse()
                    .map_err(|_| JobError::Validation(format!("Unknown job type '{raw}'")))
            })
            .transpose()?;
        let experience_level = self
            .experience_level
            .map(|raw| {
                raw.parse().map_err(|_| {
                    JobError::Validation(format!("Unknown experience level '{raw}'"))
                })
            })
            .transpose()?;

        let query = JobSearchQuery {
            search: self.search,
            location: self.location,
            job_type,
            experience_level,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            skills: self
                .skills
                .as_deref()
                .map(JobSearchQuery::skills_from_csv)
                .unwrap_or_default(),
        };
        Ok((query, Pagination::new(self.page, self.limit)))
    }
}

async fn create_job_handler(
    State(state): State<JobRouterState>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Recruiter])?;
    let job = state.jobs.create(&caller, draft)?;
    Ok((
        StatusCode::CREATED,
        ApiEnvelope::data(job).with_message("Job created successfully"),
    )
        .into_response())
}

async fn search_jobs_handler(
    State(state): State<JobRouterState>,
    Query(params): Query<JobSearchParams>,
) -> Result<Response, ApiError> {
    let (query, window) = params.into_query()?;
    let page = state.jobs.search(&query, window)?;
    Ok(ApiEnvelope::page(page, window).into_response())
}

async fn get_job_handler(
    State(state): State<JobRouterState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let job = state.jobs.get(&JobId(id))?;
    Ok(ApiEnvelope::data(job).into_response())
}

async fn my_jobs_handler(
    State(state): State<JobRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Recruiter])?;
    let jobs = state.jobs.list_mine(&caller.id)?;
    Ok(ApiEnvelope::listing(jobs).into_response())
}

async fn recommended_jobs_handler(
    State(state): State<JobRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Student])?;
    let jobs = state.jobs.recommended(&caller.id)?;
    Ok(ApiEnvelope::listing(jobs).into_response())
}

async fn update_job_handler(
    State(state): State<JobRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<JobUpdate>,
) -> Result<Response, ApiError> {
    let caller = state
        .identity
        .authorize(&headers, &[Role::Recruiter, Role::Admin])?;
    let job = state.jobs.update(&caller, &JobId(id), update)?;
    Ok(ApiEnvelope::data(job)
        .with_message("Job updated successfully")
        .into_response())
}

async fn delete_job_handler(
    State(state): State<JobRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = state
        .identity
        .authorize(&headers, &[Role::Recruiter, Role::Admin])?;
    state.jobs.delete(&caller, &JobId(id))?;
    Ok(ApiEnvelope::message("Job deleted successfully").into_response())
}
