use crate::cli::ServeArgs;
use crate::infra::{mail_route, AppState, ConfiguredTransport};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use inquiry_desk::config::AppConfig;
use inquiry_desk::error::AppError;
use inquiry_desk::telemetry;
use inquiry_desk::workflows::submission::{
    submission_router, BriefWriter, RoutingTable, SubmissionService,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::services::ServeDir;
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

    let transport = ConfiguredTransport::from_config(&config.mail)?;
    let transport_label = transport.label();
    let submissions = Arc::new(SubmissionService::new(
        Arc::new(RoutingTable::with_defaults()),
        BriefWriter::new(config.documents.output_dir.clone()),
        Arc::new(transport),
        mail_route(&config.mail),
    ));

    let app = with_operational_routes(submission_router(submissions))
        .fallback_service(ServeDir::new(&config.assets.static_dir))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        transport = transport_label,
        briefs = %config.documents.output_dir.display(),
        "inquiry desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
