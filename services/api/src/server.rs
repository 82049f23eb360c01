use crate::cli::ServeArgs;
use crate::infra::{standard_dispatcher, AppState};
use crate::routes::with_service_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use clinical_scores::config::AppConfig;
use clinical_scores::error::AppError;
use clinical_scores::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let dispatcher = standard_dispatcher()?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        started_at: Utc::now(),
        scores_loaded: dispatcher.registry().len(),
    };

    let app = with_service_routes(dispatcher)
        .layer(DefaultBodyLimit::max(config.catalog.max_payload_bytes))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "clinical score catalog ready");

    axum::serve(listener, app).await?;
    Ok(())
}
