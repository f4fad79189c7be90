use crate::cli::ServeArgs;
use crate::infra::{AppState, LocalFileStore, QueuedEmailSender, ServiceContext};
use crate::routes::api_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placewise::config::AppConfig;
use placewise::error::AppError;
use placewise::store::memory::MemoryStore;
use placewise::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(QueuedEmailSender::spawn());
    let files = Arc::new(LocalFileStore::new(&config.uploads));
    let ctx = ServiceContext::build(store, mailer, files, &config);

    if let Some(seed) = &config.admin_seed {
        let admin = ctx.identity.ensure_admin(seed)?;
        info!(email = %admin.email, "admin account provisioned");
    }

    let app = api_router(&ctx)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placewise marketplace API ready");

    axum::serve(listener, app).await?;
    Ok(())
}
