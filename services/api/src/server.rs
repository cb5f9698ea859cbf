use crate::cli::ServeArgs;
use crate::infra::{build_advisor, AppState};
use crate::routes::with_advisor_routes;
use arch_advisor::config::AppConfig;
use arch_advisor::error::AppError;
use arch_advisor::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let advisor = Arc::new(build_advisor(
        config.advisor.catalog_path.as_deref(),
        config.advisor.config_path.as_deref(),
    )?);
    let catalog_version = advisor.catalog().version().to_string();

    let app = with_advisor_routes(advisor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, catalog = %catalog_version, "architecture advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
