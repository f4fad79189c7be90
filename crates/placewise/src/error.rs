use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::applications::service::ApplicationError;
use crate::companies::service::CompanyError;
use crate::config::ConfigError;
use crate::identity::service::IdentityError;
use crate::jobs::service::JobError;
use crate::saved_jobs::service::SavedJobError;
use crate::storage::StorageError;
use crate::store::RepositoryError;
use crate::telemetry::TelemetryError;

/// Request-level error. Every component error converts into this and maps to
/// the `{success:false, message}` envelope with its own HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Company(#[from] CompanyError),
    #[error(transparent)]
    Job(#[from] JobError),
    #[error(transparent)]
    Application(#[from] ApplicationError),
    #[error(transparent)]
    SavedJob(#[from] SavedJobError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Identity(err) => err.status(),
            ApiError::Company(err) => err.status(),
            ApiError::Job(err) => err.status(),
            ApiError::Application(err) => err.status(),
            ApiError::SavedJob(err) => err.status(),
            ApiError::Storage(err) => err.status(),
            ApiError::Repository(err) => err.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Process-level error for the API binary's bootstrap and demo paths.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<IdentityError> for AppError {
    fn from(value: IdentityError) -> Self {
        AppError::Api(ApiError::Identity(value))
    }
}

impl From<CompanyError> for AppError {
    fn from(value: CompanyError) -> Self {
        AppError::Api(ApiError::Company(value))
    }
}

impl From<JobError> for AppError {
    fn from(value: JobError) -> Self {
        AppError::Api(ApiError::Job(value))
    }
}

impl From<ApplicationError> for AppError {
    fn from(value: ApplicationError) -> Self {
        AppError::Api(ApiError::Application(value))
    }
}

impl From<SavedJobError> for AppError {
    fn from(value: SavedJobError) -> Self {
        AppError::Api(ApiError::SavedJob(value))
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        AppError::Api(ApiError::Repository(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                IdentityError::Validation("bad".to_string()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (IdentityError::MissingToken.into(), StatusCode::UNAUTHORIZED),
            (IdentityError::Forbidden.into(), StatusCode::FORBIDDEN),
            (IdentityError::DuplicateEmail.into(), StatusCode::CONFLICT),
            (CompanyError::NotFound.into(), StatusCode::NOT_FOUND),
            (JobError::CompanyNotApproved.into(), StatusCode::BAD_REQUEST),
            (
                ApplicationError::AlreadyApplied.into(),
                StatusCode::CONFLICT,
            ),
            (
                ApplicationError::DeadlinePassed.into(),
                StatusCode::BAD_REQUEST,
            ),
            (SavedJobError::AlreadySaved.into(), StatusCode::CONFLICT),
            (
                RepositoryError::Unavailable("down".to_string()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{error}");
        }
    }

    #[test]
    fn envelope_reports_failure() {
        let error = ApiError::from(ApplicationError::ResumeRequired);
        assert_eq!(error.to_string(), "Please upload your resume first");
    }
}
