use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::error::ApiError;
use crate::http::ApiEnvelope;
use crate::storage::{FileStore, UploadKind, UploadRequest};

use super::domain::{AccountId, ResumeRef};
use super::service::{IdentityService, LoginRequest, ProfileUpdate, RegisterRequest};

#[derive(Clone)]
pub struct IdentityRouterState {
    pub identity: Arc<IdentityService>,
    pub files: Arc<dyn FileStore>,
}

pub fn auth_router(state: IdentityRouterState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", get(logout_handler))
        .route("/api/auth/me", get(me_handler))
        .with_state(state)
}

pub fn profile_router(state: IdentityRouterState) -> Router {
    Router::new()
        .route("/api/profile", get(profile_handler).put(update_profile_handler))
        .route("/api/profile/resume", post(upload_resume_handler))
        .route("/api/profile/image", post(upload_image_handler))
        .route("/api/profile/:id", get(public_profile_handler))
        .with_state(state)
}

async fn register_handler(
    State(state): State<IdentityRouterState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let account = state.identity.register(request)?;
    Ok((
        StatusCode::CREATED,
        ApiEnvelope::data(account).with_message("Registered successfully"),
    )
        .into_response())
}

async fn login_handler(
    State(state): State<IdentityRouterState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (account, token) = state
        .identity
        .authenticate(&request.email, &request.password)?;
    let envelope = ApiEnvelope::data(json!({ "token": token, "user": account }))
        .with_message("Logged in successfully");
    Ok(envelope.into_response())
}

async fn logout_handler() -> ApiEnvelope {
    // Sessions are stateless tokens; the client simply discards its copy.
    ApiEnvelope::message("Logged out successfully")
}

async fn me_handler(
    State(state): State<IdentityRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[])?;
    let account = state.identity.account(&caller.id)?;
    Ok(ApiEnvelope::data(account).into_response())
}

async fn profile_handler(
    State(state): State<IdentityRouterState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[])?;
    let account = state.identity.account(&caller.id)?;
    Ok(ApiEnvelope::data(account).into_response())
}

async fn update_profile_handler(
    State(state): State<IdentityRouterState>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[])?;
    let account = state.identity.update_profile(&caller.id, update)?;
    Ok(ApiEnvelope::data(account)
        .with_message("Profile updated successfully")
        .into_response())
}

async fn upload_resume_handler(
    State(state): State<IdentityRouterState>,
    headers: HeaderMap,
    Json(upload): Json<UploadRequest>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[])?;
    let stored = state.files.put(
        UploadKind::Resume,
        &upload.filename,
        upload.content.as_bytes(),
    )?;
    let resume = ResumeRef {
        url: stored.url,
        original_name: stored.original_name,
    };
    state.identity.set_resume(&caller.id, resume.clone())?;
    Ok(ApiEnvelope::data(json!({ "resume": resume }))
        .with_message("Resume uploaded successfully")
        .into_response())
}

async fn upload_image_handler(
    State(state): State<IdentityRouterState>,
    headers: HeaderMap,
    Json(upload): Json<UploadRequest>,
) -> Result<Response, ApiError> {
    let caller = state.identity.authorize(&headers, &[])?;
    let stored = state.files.put(
        UploadKind::ProfileImage,
        &upload.filename,
        upload.content.as_bytes(),
    )?;
    state
        .identity
        .set_profile_image(&caller.id, stored.url.clone())?;
    Ok(ApiEnvelope::data(json!({ "profileImage": stored.url }))
        .with_message("Profile image uploaded successfully")
        .into_response())
}

async fn public_profile_handler(
    State(state): State<IdentityRouterState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let account = state.identity.account(&AccountId(id))?;
    Ok(ApiEnvelope::data(account).into_response())
}
