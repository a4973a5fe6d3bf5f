//! In-process backend over the metadata repository.
//!
//! Authoritative for response shapes. Every call resolves after a small
//! artificial latency, standing in for the network hop the HTTP variant
//! pays for real.

use super::{AdminBackend, BackendError};
use crate::catalog::models::*;
use crate::catalog::{stats, MetadataRepository};
use crate::fixes::{ComprehensiveReport, FixCoordinator, FixReport, ProgressEvent};
use crate::search::SearchEngine;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Fault probability of the demo backend; rolled once per fix invocation.
pub const DEFAULT_FAULT_PROBABILITY: f64 = 0.05;

const DEFAULT_LATENCY: Duration = Duration::from_millis(150);

pub struct InProcessBackend {
    repository: Arc<dyn MetadataRepository>,
    engine: SearchEngine,
    coordinator: FixCoordinator,
    latency: Duration,
}

impl InProcessBackend {
    pub fn new(
        repository: Arc<dyn MetadataRepository>,
        fault_probability: f64,
        latency: Duration,
    ) -> Self {
        Self {
            repository,
            engine: SearchEngine::new(),
            coordinator: FixCoordinator::new(fault_probability),
            latency,
        }
    }

    /// Demo backend over the seeded fixture catalog.
    pub fn with_fixture() -> Self {
        Self::new(
            Arc::new(crate::catalog::seed_repository()),
            DEFAULT_FAULT_PROBABILITY,
            DEFAULT_LATENCY,
        )
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Like [`AdminBackend::run_fix`], with a per-tick progress callback.
    /// Only available in-process; the HTTP path resolves with the report
    /// alone.
    pub async fn run_fix_with_progress(
        &self,
        operation: &str,
        on_progress: impl FnMut(&ProgressEvent),
    ) -> Result<FixReport, BackendError> {
        self.simulate_latency().await;
        Ok(self.coordinator.run(operation, on_progress).await?)
    }

    /// Comprehensive run with re-projected overall progress.
    pub async fn run_comprehensive_with_progress(
        &self,
        on_progress: impl FnMut(&ProgressEvent),
    ) -> Result<ComprehensiveReport, BackendError> {
        self.simulate_latency().await;
        Ok(self.coordinator.run_comprehensive(on_progress).await?)
    }
}

#[async_trait]
impl AdminBackend for InProcessBackend {
    async fn search_songs(
        &self,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SongSearchResult>, BackendError> {
        self.simulate_latency().await;
        Ok(self.engine.search_songs(self.repository.as_ref(), term, limit))
    }

    async fn search_artists(
        &self,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ArtistSearchResult>, BackendError> {
        self.simulate_latency().await;
        Ok(self
            .engine
            .search_artists(self.repository.as_ref(), term, limit))
    }

    async fn song_variants(&self, id: u32) -> Result<SongVariants, BackendError> {
        self.simulate_latency().await;
        Ok(self.engine.song_variants(self.repository.as_ref(), id))
    }

    async fn artist_variants(&self, id: u32) -> Result<ArtistVariants, BackendError> {
        self.simulate_latency().await;
        Ok(self.engine.artist_variants(self.repository.as_ref(), id))
    }

    async fn advanced_search(
        &self,
        query: AdvancedSearchQuery,
    ) -> Result<AdvancedSearchResults, BackendError> {
        self.simulate_latency().await;
        Ok(self.engine.advanced_search(self.repository.as_ref(), &query))
    }

    async fn suggestions(&self, term: &str) -> Result<Vec<Suggestion>, BackendError> {
        self.simulate_latency().await;
        Ok(self.engine.suggestions(self.repository.as_ref(), term))
    }

    async fn db_stats(&self) -> Result<DbStats, BackendError> {
        self.simulate_latency().await;
        Ok(stats::db_stats(self.repository.as_ref()))
    }

    async fn secondary_stats(&self) -> Result<SecondaryStats, BackendError> {
        self.simulate_latency().await;
        Ok(stats::secondary_stats(self.repository.as_ref()))
    }

    async fn deduplication_stats(&self) -> Result<DeduplicationStats, BackendError> {
        self.simulate_latency().await;
        Ok(stats::deduplication_stats(self.repository.as_ref()))
    }

    async fn database_issues(&self) -> Result<DatabaseIssues, BackendError> {
        self.simulate_latency().await;
        Ok(stats::database_issues(self.repository.as_ref()))
    }

    async fn recent_songs(&self) -> Result<Vec<RecentSong>, BackendError> {
        self.simulate_latency().await;
        Ok(stats::recent_songs(self.repository.as_ref()))
    }

    async fn top_artists(&self) -> Result<Vec<TopArtist>, BackendError> {
        self.simulate_latency().await;
        Ok(stats::top_artists(self.repository.as_ref()))
    }

    async fn distribution(&self) -> Result<DistributionData, BackendError> {
        self.simulate_latency().await;
        Ok(stats::distribution_data(self.repository.as_ref()))
    }

    async fn year_distribution(&self) -> Result<Vec<YearCount>, BackendError> {
        self.simulate_latency().await;
        Ok(stats::year_distribution(self.repository.as_ref()))
    }

    async fn top_genres(&self) -> Result<Vec<GenreCount>, BackendError> {
        self.simulate_latency().await;
        Ok(stats::top_genres(self.repository.as_ref()))
    }

    async fn health(&self) -> Result<HealthScore, BackendError> {
        self.simulate_latency().await;
        Ok(stats::health_score(self.repository.as_ref()))
    }

    async fn run_fix(&self, operation: &str) -> Result<FixReport, BackendError> {
        self.run_fix_with_progress(operation, |_| {}).await
    }

    async fn run_comprehensive_fix(&self) -> Result<ComprehensiveReport, BackendError> {
        self.run_comprehensive_with_progress(|_| {}).await
    }
}
