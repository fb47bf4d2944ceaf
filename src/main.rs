use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use resume_classify::{
    app_state::AppState,
    config::AppConfig,
    routes,
    services::{
        classifier::{Classifier, KeywordClassifier},
        processor::JobProcessor,
        runner::RunnerConfig,
        staging::StagingArea,
    },
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing resume-classify server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    routes::metrics::describe_metrics();

    // Staging area for uploaded documents
    tracing::info!(upload_dir = %config.upload_dir.display(), "Preparing upload directory");
    let staging = StagingArea::new(&config.upload_dir).expect("Failed to create upload directory");

    // Initialize the classifier once; jobs fail fast if it is unavailable
    let classifier: Option<Arc<dyn Classifier>> =
        match KeywordClassifier::from_path(config.categories_path.as_deref()) {
            Ok(classifier) => {
                tracing::info!(
                    categories = classifier.categories().len(),
                    "Classifier loaded"
                );
                Some(Arc::new(classifier))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize classifier");
                None
            }
        };

    // Start the background worker pool
    let processor = JobProcessor::start(
        RunnerConfig {
            workers: config.worker_count,
            queue_capacity: config.queue_capacity,
            timeout: config.job_timeout(),
        },
        classifier,
    );

    let state = AppState::new(processor, staging);

    let app = routes::api_router(state, config.max_upload_bytes)
        .merge(routes::metrics::metrics_router(prometheus_handle));

    tracing::info!("Starting resume-classify on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
