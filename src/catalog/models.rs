//! Wire and domain model types for the metadata catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A song row as ingested from the metadata pipeline.
///
/// Title and primary artist are optional on purpose: the whole point of the
/// admin dashboard is surfacing rows where they are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: u32,
    pub title: Option<String>,
    pub primary_artist: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Secondary artist name mentions, as free text (not yet resolved to
    /// artist rows).
    #[serde(default)]
    pub featured_artists: Vec<String>,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub album: Option<String>,
    pub canonical_song_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: u32,
    pub name: String,
}

/// A song-artist relation row. `artist_order` 0 is the headline slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SongArtistRelation {
    pub song_id: u32,
    pub artist_id: u32,
    pub is_primary: bool,
    pub artist_order: u32,
}

/// Display flag derived from the alias maps, never stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasStatus {
    #[serde(rename = "Has Aliases")]
    HasAliases,
    #[serde(rename = "No Aliases")]
    NoAliases,
}

impl AliasStatus {
    pub fn from_aliases(aliases: &[String]) -> Self {
        if aliases.is_empty() {
            AliasStatus::NoAliases
        } else {
            AliasStatus::HasAliases
        }
    }
}

// =============================================================================
// Search result shapes
// =============================================================================

/// A song search hit. The transient relevance score used for ordering is
/// stripped before this struct is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongSearchResult {
    pub id: u32,
    pub title: Option<String>,
    pub primary_artist: Option<String>,
    pub alias_status: AliasStatus,
    pub canonical_song_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchResult {
    pub id: u32,
    pub name: String,
    pub alias_status: AliasStatus,
    pub song_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    pub alias_kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiblingSong {
    pub id: u32,
    pub title: Option<String>,
    pub primary_artist: Option<String>,
    pub relation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongIdentity {
    pub id: u32,
    pub title: Option<String>,
    pub primary_artist: Option<String>,
    pub canonical_song_id: Option<u32>,
}

/// Variant bundle for a song. `song_data: None` is the representable
/// "not found" state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongVariants {
    pub song_data: Option<SongVariantData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongVariantData {
    pub original: SongIdentity,
    pub aliases: Vec<AliasEntry>,
    pub sibling_songs: Vec<SiblingSong>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistIdentity {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArtistSongStats {
    pub total_songs: usize,
    pub primary_songs: usize,
    pub featured_songs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSong {
    pub id: u32,
    pub title: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistVariants {
    pub artist_data: Option<ArtistVariantData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistVariantData {
    pub original: ArtistIdentity,
    pub aliases: Vec<AliasEntry>,
    pub song_stats: ArtistSongStats,
    pub sample_songs: Vec<SampleSong>,
}

// =============================================================================
// Advanced search and suggestions
// =============================================================================

/// Solo vs. collaboration bucket, derived from the relation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationFilter {
    Solo,
    Collaboration,
}

/// Filters for the advanced search. Absent fields are no-ops; present
/// fields combine conjunctively with the free-text containment check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvancedSearchQuery {
    #[serde(default)]
    pub query: String,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub collaboration: Option<CollaborationFilter>,
    pub min_song_count: Option<usize>,
    pub max_song_count: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedSearchResults {
    pub songs: Vec<SongSearchResult>,
    pub artists: Vec<ArtistSearchResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Song,
    Artist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub id: u32,
    pub text: String,
    pub subtext: String,
}

// =============================================================================
// Dashboard stat groups
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbStats {
    pub songs: usize,
    pub artists: usize,
    pub song_artist_relations: usize,
    pub primary_artists: usize,
    pub featured_artists: usize,
    pub song_aliases: usize,
    pub artist_aliases: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryStats {
    pub songs_with_secondary: usize,
    pub unique_secondary_count: usize,
    pub total_secondary_mentions: usize,
    pub existing_in_artist_table: usize,
    pub missing_from_artist_table: usize,
    pub missing_relationships: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeduplicationStats {
    pub song_aliases: usize,
    pub artist_aliases: usize,
    pub songs_without_aliases: usize,
    pub canonical_mappings: usize,
    pub artists_without_aliases: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseIssues {
    pub orphaned_songs: usize,
    pub missing_primary: usize,
    pub inconsistent_artists: usize,
    pub duplicate_relations: usize,
    pub orphaned_aliases: usize,
    pub null_values: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentSong {
    pub id: u32,
    pub title: Option<String>,
    pub primary_artist: Option<String>,
    pub created_at: DateTime<Utc>,
    pub artist_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopArtist {
    pub id: u32,
    pub name: String,
    pub song_count: usize,
    pub primary_count: usize,
    pub featured_count: usize,
}

/// One named histogram bucket; zero-valued buckets are omitted upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionData {
    pub artists_per_song: Vec<DistributionBucket>,
    pub songs_per_artist: Vec<DistributionBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall_health: f64,
    pub completeness_score: f64,
    pub data_quality_score: f64,
    pub relationship_score: f64,
    pub total_songs: usize,
    pub total_artists: usize,
    pub primary_relationships: usize,
    pub null_values: usize,
    pub orphaned_songs: usize,
}
