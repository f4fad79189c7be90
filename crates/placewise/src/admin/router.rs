use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::applications::domain::ApplicationStatus;
use crate::applications::service::ApplicationError;
use crate::companies::domain::CompanyId;
use crate::companies::repository::CompanyFilter;
use crate::companies::service::CompanyDirectoryService;
use crate::error::ApiError;
use crate::http::ApiEnvelope;
use crate::identity::domain::{AccountId, Role};
use crate::identity::repository::AccountFilter;
use crate::identity::service::{IdentityError, IdentityService};
use crate::jobs::domain::{JobId, JobStatus};
use crate::jobs::repository::JobFilter;
use crate::jobs::service::JobCatalogService;
use crate::store::Pagination;

use super::service::AdminService;

#[derive(Clone)]
pub struct AdminRouterState {
    pub identity: Arc<IdentityService>,
    pub admin: Arc<AdminService>,
    pub companies: Arc<CompanyDirectoryService>,
    pub jobs: Arc<JobCatalogService>,
}

pub fn admin_router(state: AdminRouterState) -> Router {
    Router::new()
        .route("/api/admin/stats", get(stats_handler))
        .route("/api/admin/users", get(list_users_handler))
        .route(
            "/api/admin/users/:id/toggle-status",
            axum::routing::put(toggle_user_handler),
        )
        .route(
            "/api/admin/users/:id",
            axum::routing::delete(delete_user_handler),
        )
        .route("/api/admin/companies", get(list_companies_handler))
        .route(
            "/api/admin/companies/:id/approve",
            axum::routing::put(approve_company_handler),
        )
        .route("/api/admin/jobs", get(list_jobs_handler))
        .route(
            "/api/admin/jobs/:id/approve",
            axum::routing::put(approve_job_handler),
        )
        .route("/api/admin/applications", get(list_applications_handler))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct UserListParams {
    role: Option<String>,
    #[serde(rename = "isActive")]
    is_active: Option<bool>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ApprovalListParams {
    #[serde(rename = "isApproved")]
    is_approved: Option<bool>,
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApprovalRequest {
    #[serde(rename = "isApproved")]
    is_approved: bool,
}

async fn stats_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let stats = state.admin.dashboard_stats().map_err(ApiError::from)?;
    Ok(ApiEnvelope::data(stats).into_response())
}

async fn list_users_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Query(params): Query<UserListParams>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let role = params
        .role
        .map(|raw| {
            raw.parse::<Role>()
                .map_err(|_| IdentityError::Validation(format!("Unknown role '{raw}'")))
        })
        .transpose()?;
    let filter = AccountFilter {
        role,
        active: params.is_active,
    };
    let window = Pagination::new(params.page, params.limit);
    let page = state.admin.list_users(&filter, window)?;
    Ok(ApiEnvelope::page(page, window).into_response())
}

async fn toggle_user_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let account = state.identity.toggle_active(&AccountId(id))?;
    let message = if account.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(ApiEnvelope::data(account).with_message(message).into_response())
}

async fn delete_user_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    state.identity.delete_account(&AccountId(id))?;
    Ok(ApiEnvelope::message("User deleted successfully").into_response())
}

async fn list_companies_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Query(params): Query<ApprovalListParams>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let filter = CompanyFilter {
        approved: params.is_approved,
    };
    let window = Pagination::new(params.page, params.limit);
    let page = state.admin.list_companies(&filter, window)?;
    Ok(ApiEnvelope::page(page, window).into_response())
}

async fn approve_company_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<ApprovalRequest>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let company = state
        .companies
        .set_approval(&CompanyId(id), request.is_approved)?;
    let message = if request.is_approved {
        "Company approved successfully"
    } else {
        "Company rejected successfully"
    };
    Ok(ApiEnvelope::data(company).with_message(message).into_response())
}

async fn list_jobs_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Query(params): Query<ApprovalListParams>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let status = params
        .status
        .map(|raw| {
            raw.parse::<JobStatus>().map_err(|_| {
                crate::jobs::service::JobError::Validation(format!("Unknown job status '{raw}'"))
            })
        })
        .transpose()?;
    let filter = JobFilter {
        approved: params.is_approved,
        status,
    };
    let window = Pagination::new(params.page, params.limit);
    let page = state.admin.list_jobs(&filter, window)?;
    Ok(ApiEnvelope::page(page, window).into_response())
}

async fn approve_job_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<ApprovalRequest>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let job = state.jobs.set_approval(&JobId(id), request.is_approved)?;
    let message = if request.is_approved {
        "Job approved successfully"
    } else {
        "Job rejected successfully"
    };
    Ok(ApiEnvelope::data(job).with_message(message).into_response())
}

async fn list_applications_handler(
    State(state): State<AdminRouterState>,
    headers: HeaderMap,
    Query(params): Query<ApprovalListParams>,
) -> Result<Response, ApiError> {
    state.identity.authorize(&headers, &[Role::Admin])?;
    let status = params
        .status
        .map(|raw| {
            raw.parse::<ApplicationStatus>().map_err(|_| {
                ApplicationError::Validation(format!("Unknown application status '{raw}'"))
            })
        })
        .transpose()?;
    let window = Pagination::new(params.page, params.limit);
    let page = state.admin.list_applications(status, window)?;
    Ok(ApiEnvelope::page(page, window).into_response())
}
