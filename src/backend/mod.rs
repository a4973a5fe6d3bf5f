//! The service surface consumed by the dashboard.
//!
//! Two interchangeable implementations exist for every operation: the
//! in-process backend (authoritative for response shapes) and a thin
//! HTTP client. Capabilities that a backend does not have surface as the
//! explicit [`BackendError::Unavailable`] variant so callers can tell
//! "this does not exist here" apart from "this call failed".

mod http;
mod in_process;

pub use http::HttpBackend;
pub use in_process::InProcessBackend;

use crate::catalog::models::*;
use crate::fixes::{ComprehensiveReport, FixError, FixReport};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The operation-type identifier is not in the known template set.
    /// Rejected before any side effect.
    #[error("unknown fix operation: {0}")]
    UnknownOperation(String),

    /// Transient connection failure, simulated or real.
    #[error("connection to the metadata service failed")]
    ConnectionFailed,

    /// The capability does not exist on this backend.
    #[error("{0} is not available on this backend")]
    Unavailable(&'static str),

    /// The HTTP backend got a non-success response.
    #[error("server returned status {status}")]
    Http { status: u16 },

    /// The HTTP backend could not complete the exchange.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<FixError> for BackendError {
    fn from(err: FixError) -> Self {
        match err {
            FixError::UnknownOperation(op) => BackendError::UnknownOperation(op),
            FixError::ConnectionFailed => BackendError::ConnectionFailed,
        }
    }
}

/// Every service operation of the dashboard, promise-shaped.
///
/// "Nothing found" is always a representable empty or null result, never
/// an error; errors are reserved for the taxonomy in [`BackendError`].
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn search_songs(
        &self,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SongSearchResult>, BackendError>;

    async fn search_artists(
        &self,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ArtistSearchResult>, BackendError>;

    async fn song_variants(&self, id: u32) -> Result<SongVariants, BackendError>;

    async fn artist_variants(&self, id: u32) -> Result<ArtistVariants, BackendError>;

    /// Optionally unavailable; the HTTP backend rejects with
    /// [`BackendError::Unavailable`].
    async fn advanced_search(
        &self,
        query: AdvancedSearchQuery,
    ) -> Result<AdvancedSearchResults, BackendError>;

    /// Optionally unavailable; the HTTP backend rejects with
    /// [`BackendError::Unavailable`].
    async fn suggestions(&self, term: &str) -> Result<Vec<Suggestion>, BackendError>;

    async fn db_stats(&self) -> Result<DbStats, BackendError>;
    async fn secondary_stats(&self) -> Result<SecondaryStats, BackendError>;
    async fn deduplication_stats(&self) -> Result<DeduplicationStats, BackendError>;
    async fn database_issues(&self) -> Result<DatabaseIssues, BackendError>;
    async fn recent_songs(&self) -> Result<Vec<RecentSong>, BackendError>;
    async fn top_artists(&self) -> Result<Vec<TopArtist>, BackendError>;
    async fn distribution(&self) -> Result<DistributionData, BackendError>;
    async fn year_distribution(&self) -> Result<Vec<YearCount>, BackendError>;
    async fn top_genres(&self) -> Result<Vec<GenreCount>, BackendError>;
    async fn health(&self) -> Result<HealthScore, BackendError>;

    async fn run_fix(&self, operation: &str) -> Result<FixReport, BackendError>;
    async fn run_comprehensive_fix(&self) -> Result<ComprehensiveReport, BackendError>;
}
