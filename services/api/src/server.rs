use crate::cli::ServeArgs;
use crate::infra::{load_dataset, AppState};
use crate::routes::with_kpi_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dept_kpi::config::AppConfig;
use dept_kpi::error::AppError;
use dept_kpi::kpi::KpiReportService;
use dept_kpi::telemetry;
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

    let dataset = load_dataset(config.kpi.data_dir.as_deref())?;
    let report_service = Arc::new(KpiReportService::new(
        Arc::new(dataset),
        config.kpi.corrections(),
    ));

    let app = with_kpi_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "department kpi service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
