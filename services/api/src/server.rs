use crate::cli::ServeArgs;
use crate::infra::{
    default_recognition_config, sample_directory, AppState, InMemoryRecognitionStore,
};
use crate::routes::with_recognition_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use merit_engine::config::AppConfig;
use merit_engine::error::AppError;
use merit_engine::telemetry;
use merit_engine::workflows::recognition::RecognitionService;
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

    let store = Arc::new(InMemoryRecognitionStore::default());
    let directory = Arc::new(sample_directory());
    let recognition_service = Arc::new(RecognitionService::new(
        store,
        directory,
        default_recognition_config(),
    ));

    let app = with_recognition_routes(recognition_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recognition service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
