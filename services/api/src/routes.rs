use crate::infra::{AppState, ServiceContext};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use placewise::admin::router::{admin_router, AdminRouterState};
use placewise::applications::router::{application_router, ApplicationRouterState};
use placewise::companies::router::{company_router, CompanyRouterState};
use placewise::identity::router::{auth_router, profile_router, IdentityRouterState};
use placewise::jobs::router::{job_router, JobRouterState};
use placewise::saved_jobs::router::{saved_job_router, SavedJobRouterState};
use serde_json::json;

pub(crate) fn api_router(ctx: &ServiceContext) -> axum::Router {
    let identity_state = IdentityRouterState {
        identity: ctx.identity.clone(),
        files: ctx.files.clone(),
    };

    auth_router(identity_state.clone())
        .merge(profile_router(identity_state))
        .merge(company_router(CompanyRouterState {
            identity: ctx.identity.clone(),
            companies: ctx.companies.clone(),
            files: ctx.files.clone(),
        }))
        .merge(job_router(JobRouterState {
            identity: ctx.identity.clone(),
            jobs: ctx.jobs.clone(),
        }))
        .merge(application_router(ApplicationRouterState {
            identity: ctx.identity.clone(),
            applications: ctx.applications.clone(),
        }))
        .merge(saved_job_router(SavedJobRouterState {
            identity: ctx.identity.clone(),
            saved_jobs: ctx.saved_jobs.clone(),
        }))
        .merge(admin_router(AdminRouterState {
            identity: ctx.identity.clone(),
            admin: ctx.admin.clone(),
            companies: ctx.companies.clone(),
            jobs: ctx.jobs.clone(),
        }))
        .route("/api/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "success": true, "message": "Server is running" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::LocalFileStore;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use placewise::config::{AdminSeed, AppConfig};
    use placewise::notifications::{EmailError, EmailMessage, EmailSender};
    use placewise::store::memory::MemoryStore;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct DroppedMail;

    impl EmailSender for DroppedMail {
        fn send(&self, _message: EmailMessage) -> Result<(), EmailError> {
            Ok(())
        }
    }

    fn test_app() -> axum::Router {
        let mut config = AppConfig::load().expect("config loads");
        config.auth.jwt_secret = "routing-test-secret".to_string();
        config.uploads.directory = std::env::temp_dir()
            .join("placewise-api-test-uploads")
            .to_string_lossy()
            .into_owned();

        let ctx = ServiceContext::build(
            Arc::new(MemoryStore::default()),
            Arc::new(DroppedMail),
            Arc::new(LocalFileStore::new(&config.uploads)),
            &config,
        );
        ctx.identity
            .ensure_admin(&AdminSeed {
                name: "Root".to_string(),
                email: "root@placewise.test".to_string(),
                password: "changeme1".to_string(),
            })
            .expect("admin seeds");
        api_router(&ctx)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
            .body(Body::from(serde_json::to_vec(&body).expect("serializes")))
            .expect("request builds")
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).expect("request builds")
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    async fn login(app: &axum::Router, email: &str, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["data"]["token"]
            .as_str()
            .expect("token")
            .to_string()
    }

    #[tokio::test]
    async fn health_endpoint_reports_running() {
        let response = test_app()
            .oneshot(get_request("/api/health", None))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["success"], true);
    }

    #[tokio::test]
    async fn moderation_gates_a_job_from_draft_to_public_search() {
        let app = test_app();

        // Recruiter signs up and registers a company.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                json!({
                    "name": "Rika",
                    "email": "rika@example.com",
                    "password": "hunter22",
                    "role": "recruiter",
                }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let recruiter_token = login(&app, "rika@example.com", "hunter22").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/companies",
                Some(&recruiter_token),
                json!({
                    "name": "Initech",
                    "description": "Printing solutions",
                    "location": "Austin, TX",
                }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let company_id = body_json(response).await["data"]["id"]
            .as_str()
            .expect("company id")
            .to_string();

        // Posting before the company is approved fails.
        let job_body = json!({
            "title": "Backend Intern",
            "description": "Learn the stack",
            "requirements": ["Curiosity"],
            "location": "Austin, TX",
            "jobType": "Internship",
            "skills": ["Rust"],
            "applicationDeadline": (chrono::Utc::now() + chrono::Duration::days(30)),
        });
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/jobs",
                Some(&recruiter_token),
                job_body.clone(),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_eq!(payload["message"], "Your company is not approved yet");

        // Admin approves the company; posting now succeeds but stays pending.
        let admin_token = login(&app, "root@placewise.test", "changeme1").await;
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/admin/companies/{company_id}/approve"),
                Some(&admin_token),
                json!({ "isApproved": true }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/jobs",
                Some(&recruiter_token),
                job_body,
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = body_json(response).await;
        assert_eq!(payload["data"]["status"], "pending");
        let job_id = payload["data"]["id"].as_str().expect("job id").to_string();

        // Invisible to the public until the job itself is approved.
        let response = app
            .clone()
            .oneshot(get_request("/api/jobs?jobType=Internship", None))
            .await
            .expect("route executes");
        let payload = body_json(response).await;
        assert_eq!(payload["total"], 0);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/admin/jobs/{job_id}/approve"),
                Some(&admin_token),
                json!({ "isApproved": true }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request("/api/jobs?jobType=Internship", None))
            .await
            .expect("route executes");
        let payload = body_json(response).await;
        assert_eq!(payload["total"], 1);
        assert_eq!(payload["currentPage"], 1);
        assert_eq!(payload["data"][0]["id"], job_id.as_str());

        // Admin-only surface stays closed to the recruiter.
        let response = app
            .clone()
            .oneshot(get_request("/api/admin/stats", Some(&recruiter_token)))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
