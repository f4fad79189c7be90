use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::ApiError;
use crate::http::ApiEnvelope;
use crate::identity::domain::Role;
use crate::identity::service::IdentityService;
use crate::storage::{FileStore, UploadKind, UploadRequest};

use super::domain::CompanyId;
use super::service::{CompanyDirectoryService, CompanyDraft, CompanyUpdate};

#[derive(Clone)]
pub struct CompanyRouterState {
    pub identity: Arc<IdentityService>,
    pub companies: Arc<CompanyDirectoryService>,
    pub files: Arc<dyn FileStore>,
}

pub fn company_router(state: CompanyRouterState) -> Router {
    Router::new()
        .route(
            "/api/companies",
            get(list_companies_handler).post(create_company_handler),
        )
        .route("/api/companies/my/company", get(my_company_handler))
        .route(
            "/api/companies/:id",
            get(get_company_handler)
                .put(update_company_handler)
                .delete(delete_company_handler),
        )
        .route("/api/companies/:id/logo", post(upload_logo_handler))
        .with_state(state)
}

async fn create_company_handler(
    State(state): State<CompanyRouterState>,
    headers: HeaderMap,
    Json(draft): Json<CompanyDraft>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Recruiter])?;
    let company = state.companies.create(&caller, draft)?;
    Ok((
        StatusCode::CREATED,
        ApiEnvelope::data(company).with_message("Company created successfully"),
    )
        .into_response())
}

async fn list_companies_handler(
    State(state): State<CompanyRouterState>,
) -> Result<Response, ApiError> {
    let companies = state.companies.list_approved()?;
    Ok(ApiEnvelope::listing(companies).into_response())
}

async fn get_company_handler(
    State(state): State<CompanyRouterState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let company = state.companies.get(&CompanyId(id))?;
    Ok(ApiEnvelope::data(company).into_response())
}

async fn my_company_handler(
    State(state): State<CompanyRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[Role::Recruiter])?;
    let company = state.companies.my_company(&caller.id)?;
    Ok(ApiEnvelope::data(company).into_response())
}

async fn update_company_handler(
    State(state): State<CompanyRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<CompanyUpdate>,
) -> Result<Response, ApiError> {
    let caller = state
        .identity
        .authorize(&headers, &[Role::Recruiter, Role::Admin])?;
    let company = state.companies.update(&caller, &CompanyId(id), update)?;
    Ok(ApiEnvelope::data(company)
        .with_message("Company updated successfully")
        .into_response())
}

async fn delete_company_handler(
    State(state): State<CompanyRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = state
        .identity
        .authorize(&headers, &[Role::Recruiter, Role::Admin])?;
    state.companies.delete(&caller, &CompanyId(id))?;
    Ok(ApiEnvelope::message("Company deleted successfully").into_response())
}

async fn upload_logo_handler(
    State(state): State<CompanyRouterState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(upload): Json<UploadRequest>,
) -> Result<Response, ApiError> {
    let caller = state
        .identity
        .authorize(&headers, &[Role::Recruiter, Role::Admin])?;
    let stored = state.files.put(
        UploadKind::CompanyLogo,
        &upload.filename,
        upload.content.as_bytes(),
    )?;
    let company = state
        .companies
        .set_logo(&caller, &CompanyId(id), stored.url)?;
    Ok(ApiEnvelope::data(company)
        .with_message("Logo uploaded successfully")
        .into_response())
}
