//! Search and variants API routes

use super::metrics::record_search_query;
use super::state::{GuardedRepository, ServerState};
use crate::search::SearchEngine;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

async fn search_songs(
    State(repository): State<GuardedRepository>,
    State(engine): State<SearchEngine>,
    Query(params): Query<SearchParams>,
) -> impl axum::response::IntoResponse {
    record_search_query("songs");
    Json(engine.search_songs(repository.as_ref(), &params.q, params.limit))
}

async fn search_artists(
    State(repository): State<GuardedRepository>,
    State(engine): State<SearchEngine>,
    Query(params): Query<SearchParams>,
) -> impl axum::response::IntoResponse {
    record_search_query("artists");
    Json(engine.search_artists(repository.as_ref(), &params.q, params.limit))
}

async fn song_variants(
    State(repository): State<GuardedRepository>,
    State(engine): State<SearchEngine>,
    Path(id): Path<u32>,
) -> impl axum::response::IntoResponse {
    // unknown ids resolve to the null-data shell, not a 404
    Json(engine.song_variants(repository.as_ref(), id))
}

async fn artist_variants(
    State(repository): State<GuardedRepository>,
    State(engine): State<SearchEngine>,
    Path(id): Path<u32>,
) -> impl axum::response::IntoResponse {
    Json(engine.artist_variants(repository.as_ref(), id))
}

pub fn make_search_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search/songs", get(search_songs))
        .route("/search/artists", get(search_artists))
        .route("/variants/song/{id}", get(song_variants))
        .route("/variants/artist/{id}", get(artist_variants))
        .with_state(state)
}
