//! End-to-end tests for the dashboard stat groups
//!
//! Every stat endpoint is exercised over HTTP through the crate's own
//! client backend; counts are asserted against the fixture catalog.

mod common;

use common::TestServer;
use tunedeck_admin_server::backend::{AdminBackend, HttpBackend};

#[tokio::test]
async fn test_db_stats_match_fixture() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let stats = backend.db_stats().await.unwrap();
    assert_eq!(stats.songs, 26);
    assert_eq!(stats.artists, 12);
    assert_eq!(stats.song_artist_relations, 29);
    assert_eq!(stats.primary_artists, 24);
    assert_eq!(stats.featured_artists, 5);
    assert_eq!(stats.song_aliases, 6);
    assert_eq!(stats.artist_aliases, 4);
}

#[tokio::test]
async fn test_issue_counters_survive_the_wire() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let issues = backend.database_issues().await.unwrap();
    assert_eq!(issues.orphaned_songs, 2);
    assert_eq!(issues.missing_primary, 3);
    assert_eq!(issues.inconsistent_artists, 1);
    assert_eq!(issues.duplicate_relations, 1);
    assert_eq!(issues.orphaned_aliases, 1);
    assert_eq!(issues.null_values, 2);
}

#[tokio::test]
async fn test_secondary_and_deduplication_stats() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let secondary = backend.secondary_stats().await.unwrap();
    assert_eq!(secondary.songs_with_secondary, 5);
    assert_eq!(secondary.missing_from_artist_table, 1);
    assert_eq!(secondary.missing_relationships, 2);

    let dedup = backend.deduplication_stats().await.unwrap();
    assert_eq!(dedup.canonical_mappings, 3);
    assert_eq!(dedup.songs_without_aliases, 22);
}

#[tokio::test]
async fn test_recent_songs_are_newest_first() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let recent = backend.recent_songs().await.unwrap();
    assert_eq!(recent.len(), 10);
    for pair in recent.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn test_top_artists_order_and_split() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let top = backend.top_artists().await.unwrap();
    assert!(!top.is_empty());
    assert_eq!(top[0].name, "Velvet Atlas");
    for pair in top.windows(2) {
        assert!(pair[0].song_count >= pair[1].song_count);
    }
    for artist in &top {
        assert_eq!(artist.song_count, artist.primary_count + artist.featured_count);
    }
}

#[tokio::test]
async fn test_distribution_and_year_histograms() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let distribution = backend.distribution().await.unwrap();
    assert!(distribution
        .artists_per_song
        .iter()
        .all(|bucket| bucket.value > 0));
    assert!(distribution
        .songs_per_artist
        .iter()
        .all(|bucket| bucket.value > 0));

    let years = backend.year_distribution().await.unwrap();
    for pair in years.windows(2) {
        assert!(pair[0].year < pair[1].year);
    }

    let genres = backend.top_genres().await.unwrap();
    assert!(genres.len() <= 8);
    assert_eq!(genres[0].name, "Electronic");
}

#[tokio::test]
async fn test_health_score_composition() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let health = backend.health().await.unwrap();
    let expected = health.completeness_score * 0.4
        + health.data_quality_score * 0.3
        + health.relationship_score * 0.3;
    assert!((health.overall_health - expected).abs() < 1e-9);
    assert_eq!(health.total_songs, 26);
}
