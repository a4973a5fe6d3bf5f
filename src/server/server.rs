use anyhow::Result;
use std::time::Duration;

use crate::catalog::stats;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::http_layers::log_requests;
use super::state::*;
use super::{make_fix_routes, make_search_routes, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
    };
    Json(stats)
}

async fn get_stats(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::db_stats(repository.as_ref()))
}

async fn get_secondary_stats(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::secondary_stats(repository.as_ref()))
}

async fn get_deduplication_stats(
    State(repository): State<GuardedRepository>,
) -> impl IntoResponse {
    Json(stats::deduplication_stats(repository.as_ref()))
}

async fn get_issues(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::database_issues(repository.as_ref()))
}

async fn get_recent_songs(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::recent_songs(repository.as_ref()))
}

async fn get_top_artists(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::top_artists(repository.as_ref()))
}

async fn get_distribution(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::distribution_data(repository.as_ref()))
}

async fn get_year_distribution(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::year_distribution(repository.as_ref()))
}

async fn get_top_genres(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::top_genres(repository.as_ref()))
}

async fn get_health(State(repository): State<GuardedRepository>) -> impl IntoResponse {
    Json(stats::health_score(repository.as_ref()))
}

fn make_stats_routes(state: ServerState) -> Router {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/secondary-stats", get(get_secondary_stats))
        .route("/deduplication-stats", get(get_deduplication_stats))
        .route("/issues", get(get_issues))
        .route("/recent-songs", get(get_recent_songs))
        .route("/top-artists", get(get_top_artists))
        .route("/distribution", get(get_distribution))
        .route("/year-distribution", get(get_year_distribution))
        .route("/top-genres", get(get_top_genres))
        .route("/health", get(get_health))
        .with_state(state)
}

pub fn make_app(config: ServerConfig, repository: GuardedRepository) -> Router {
    let state = ServerState::new(config.clone(), repository);

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .merge(make_stats_routes(state.clone()))
        .merge(make_search_routes(state.clone()))
        .merge(make_fix_routes(state.clone()))
        // the dashboard frontend runs on its own origin during development
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: ServerConfig, repository: GuardedRepository) -> Result<()> {
    let port = config.port;
    let app = make_app(config, repository);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_repository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn test_app() -> Router {
        let config = ServerConfig {
            port: 0,
            requests_logging_level: super::super::RequestsLoggingLevel::None,
            frontend_dir_path: None,
            fix_fault_probability: 0.0,
        };
        make_app(config, Arc::new(seed_repository()))
    }

    async fn get_ok_json(app: Router, uri: &str) -> serde_json::Value {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn stat_routes_respond_with_json() {
        for uri in [
            "/stats",
            "/secondary-stats",
            "/deduplication-stats",
            "/issues",
            "/recent-songs",
            "/top-artists",
            "/distribution",
            "/year-distribution",
            "/top-genres",
            "/health",
        ] {
            let value = get_ok_json(test_app(), uri).await;
            assert!(!value.is_null(), "GET {}", uri);
        }
    }

    #[tokio::test]
    async fn stats_report_fixture_counts() {
        let value = get_ok_json(test_app(), "/stats").await;
        assert_eq!(value["songs"], 26);
        assert_eq!(value["artists"], 12);
        assert_eq!(value["song_artist_relations"], 29);
    }

    #[tokio::test]
    async fn short_search_query_is_empty_not_an_error() {
        let value = get_ok_json(test_app(), "/search/songs?q=a&limit=10").await;
        assert_eq!(value, serde_json::json!([]));
    }

    #[tokio::test]
    async fn search_finds_fixture_songs() {
        let value = get_ok_json(test_app(), "/search/songs?q=northern&limit=10").await;
        let results = value.as_array().unwrap();
        assert!(!results.is_empty());
        // no transient relevance field on the wire
        assert!(results[0].get("relevance").is_none());
        assert!(results[0].get("score").is_none());
    }

    #[tokio::test]
    async fn unknown_variant_ids_yield_null_shells() {
        let value = get_ok_json(test_app(), "/variants/song/424242").await;
        assert!(value["song_data"].is_null());
        let value = get_ok_json(test_app(), "/variants/artist/424242").await;
        assert!(value["artist_data"].is_null());
    }

    #[tokio::test]
    async fn unknown_fix_operation_is_a_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/fix/defragment_vibes")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn home_reports_uptime_and_version() {
        let value = get_ok_json(test_app(), "/").await;
        assert!(value["uptime"].is_string());
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    }
}
