use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;
use tracing::info;

/// Metric name prefix for all Tunedeck metrics
const PREFIX: &str = "tunedeck";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Search Metrics
    pub static ref SEARCH_QUERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_search_queries_total"), "Search queries by kind"),
        &["kind"]
    ).expect("Failed to create search_queries_total metric");

    // Fix Operation Metrics
    pub static ref FIX_OPERATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_fix_operations_total"), "Fix operations by type and outcome"),
        &["operation", "status"]
    ).expect("Failed to create fix_operations_total metric");

    pub static ref FIX_OPERATION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_fix_operation_duration_seconds"),
            "Fix operation duration in seconds"
        )
        .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 60.0]),
        &["operation"]
    ).expect("Failed to create fix_operation_duration_seconds metric");

    // Catalog Metrics
    pub static ref CATALOG_ITEMS_TOTAL: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_catalog_items_total"), "Total items in catalog"),
        &["type"]
    ).expect("Failed to create catalog_items_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(SEARCH_QUERIES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(FIX_OPERATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(FIX_OPERATION_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_ITEMS_TOTAL.clone()));

    info!("Metrics system initialized successfully");
}

/// Initialize catalog-specific metrics
pub fn init_catalog_metrics(num_songs: usize, num_artists: usize) {
    CATALOG_ITEMS_TOTAL
        .with_label_values(&["song"])
        .set(num_songs as f64);

    CATALOG_ITEMS_TOTAL
        .with_label_values(&["artist"])
        .set(num_artists as f64);

    info!(
        "Catalog metrics initialized: {} songs, {} artists",
        num_songs, num_artists
    );
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record a search query
pub fn record_search_query(kind: &str) {
    SEARCH_QUERIES_TOTAL.with_label_values(&[kind]).inc();
}

/// Record a finished fix operation
pub fn record_fix_operation(operation: &str, status: &str, duration: Duration) {
    FIX_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    FIX_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Serve the Prometheus scrape endpoint on its own port.
pub async fn run_metrics_server(port: u16) -> anyhow::Result<()> {
    let app = Router::new().route("/metrics", get(metrics_handler));
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    Ok(axum::serve(listener, app).await?)
}
