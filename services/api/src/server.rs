use crate::cli::ServeArgs;
use crate::demo::seed_demo_data;
use crate::infra::{in_memory_triage_service, AppState};
use crate::routes::with_triage_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use talent_ai::config::AppConfig;
use talent_ai::error::AppError;
use talent_ai::telemetry;
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (triage_service, repository) = in_memory_triage_service(config.triage.clone())?;
    if args.seed_demo {
        let job_id = seed_demo_data(&repository)?;
        info!(job_id = %job_id, "seeded demo job posting");
    }

    let app = with_triage_routes(Arc::new(triage_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        workers = config.triage.scoring_workers,
        timeout_secs = config.triage.run_timeout.as_secs(),
        "talent triage service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
