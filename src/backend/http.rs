//! HTTP client backend against a running admin server.
//!
//! Request shapes follow the server's route table exactly. Advanced
//! search and suggestions have no HTTP endpoint; both reject with
//! [`BackendError::Unavailable`] so callers can degrade gracefully.

use super::{AdminBackend, BackendError};
use crate::catalog::models::*;
use crate::fixes::{ComprehensiveReport, FixReport};
use crate::search::DEFAULT_SEARCH_LIMIT;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn get_search<T: DeserializeOwned>(
        &self,
        path: &str,
        term: &str,
        limit: usize,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("q", term.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::decode(response).await
    }
}

#[async_trait]
impl AdminBackend for HttpBackend {
    async fn search_songs(
        &self,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SongSearchResult>, BackendError> {
        self.get_search(
            "/search/songs",
            term,
            limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        )
        .await
    }

    async fn search_artists(
        &self,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ArtistSearchResult>, BackendError> {
        self.get_search(
            "/search/artists",
            term,
            limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        )
        .await
    }

    async fn song_variants(&self, id: u32) -> Result<SongVariants, BackendError> {
        self.get_json(&format!("/variants/song/{}", id)).await
    }

    async fn artist_variants(&self, id: u32) -> Result<ArtistVariants, BackendError> {
        self.get_json(&format!("/variants/artist/{}", id)).await
    }

    async fn advanced_search(
        &self,
        _query: AdvancedSearchQuery,
    ) -> Result<AdvancedSearchResults, BackendError> {
        Err(BackendError::Unavailable("advanced search"))
    }

    async fn suggestions(&self, _term: &str) -> Result<Vec<Suggestion>, BackendError> {
        Err(BackendError::Unavailable("suggestions"))
    }

    async fn db_stats(&self) -> Result<DbStats, BackendError> {
        self.get_json("/stats").await
    }

    async fn secondary_stats(&self) -> Result<SecondaryStats, BackendError> {
        self.get_json("/secondary-stats").await
    }

    async fn deduplication_stats(&self) -> Result<DeduplicationStats, BackendError> {
        self.get_json("/deduplication-stats").await
    }

    async fn database_issues(&self) -> Result<DatabaseIssues, BackendError> {
        self.get_json("/issues").await
    }

    async fn recent_songs(&self) -> Result<Vec<RecentSong>, BackendError> {
        self.get_json("/recent-songs").await
    }

    async fn top_artists(&self) -> Result<Vec<TopArtist>, BackendError> {
        self.get_json("/top-artists").await
    }

    async fn distribution(&self) -> Result<DistributionData, BackendError> {
        self.get_json("/distribution").await
    }

    async fn year_distribution(&self) -> Result<Vec<YearCount>, BackendError> {
        self.get_json("/year-distribution").await
    }

    async fn top_genres(&self) -> Result<Vec<GenreCount>, BackendError> {
        self.get_json("/top-genres").await
    }

    async fn health(&self) -> Result<HealthScore, BackendError> {
        self.get_json("/health").await
    }

    async fn run_fix(&self, operation: &str) -> Result<FixReport, BackendError> {
        match self
            .post_json::<FixReport>(&format!("/fix/{}", operation))
            .await
        {
            Err(BackendError::Http { status }) if status == StatusCode::BAD_REQUEST.as_u16() => {
                Err(BackendError::UnknownOperation(operation.to_string()))
            }
            Err(BackendError::Http { status })
                if status == StatusCode::SERVICE_UNAVAILABLE.as_u16() =>
            {
                Err(BackendError::ConnectionFailed)
            }
            other => other,
        }
    }

    async fn run_comprehensive_fix(&self) -> Result<ComprehensiveReport, BackendError> {
        match self.post_json::<ComprehensiveReport>("/fix/comprehensive").await {
            Err(BackendError::Http { status })
                if status == StatusCode::SERVICE_UNAVAILABLE.as_u16() =>
            {
                Err(BackendError::ConnectionFailed)
            }
            other => other,
        }
    }
}
