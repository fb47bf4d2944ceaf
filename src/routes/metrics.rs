use axum::extract::State;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Mount the Prometheus scrape endpoint at `/metrics`.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(Arc::new(handle))
}

/// Job counters, queue depth and processing-time histogram in text format.
async fn render_metrics(State(handle): State<Arc<PrometheusHandle>>) -> String {
    handle.render()
}

/// Describe the metrics recorded by the job runner.
pub fn describe_metrics() {
    metrics::describe_counter!(
        "classification_jobs_total",
        "Total documents submitted for classification"
    );
    metrics::describe_counter!(
        "classification_jobs_completed",
        "Total classification jobs completed"
    );
    metrics::describe_counter!(
        "classification_jobs_failed",
        "Total classification jobs that ended in error"
    );
    metrics::describe_histogram!(
        "classification_processing_seconds",
        "Time to process one classification job"
    );
    metrics::describe_gauge!(
        "classification_queue_depth",
        "Jobs waiting for a free worker"
    );
}
