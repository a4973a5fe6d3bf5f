//! Relevance search, variant lookup, advanced filtering and suggestions
//! over the metadata repository.
//!
//! The repository is handed in by parameter on every call; the engine
//! itself holds nothing but policy constants. Nothing in here errors:
//! short queries and unknown ids resolve to empty results.

use super::similarity::similarity;
use crate::catalog::models::*;
use crate::catalog::MetadataRepository;
use std::cmp::Ordering;

/// Queries shorter than this (after trimming) return nothing. A policy
/// floor, not an error.
pub const MIN_QUERY_LEN: usize = 2;

/// Results must score strictly above this to survive.
pub const RELEVANCE_THRESHOLD: f64 = 0.3;

/// Title similarity above which two songs of the same artist are siblings.
pub const SIBLING_SIMILARITY_THRESHOLD: f64 = 0.7;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;
pub const DEFAULT_ADVANCED_LIMIT: usize = 20;

const SUGGESTION_LIMIT: usize = 3;
const SAMPLE_SONGS_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEngine;

impl SearchEngine {
    pub fn new() -> Self {
        Self
    }

    fn query_too_short(term: &str) -> bool {
        term.trim().chars().count() < MIN_QUERY_LEN
    }

    /// Rank songs against the query by the better of title and artist
    /// similarity. Title-containment hits sort as a group ahead of
    /// everything else; within a group, higher scores first. The
    /// transient score never leaves this function.
    pub fn search_songs(
        &self,
        repo: &dyn MetadataRepository,
        term: &str,
        limit: Option<usize>,
    ) -> Vec<SongSearchResult> {
        if Self::query_too_short(term) {
            return Vec::new();
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let needle = term.trim().to_lowercase();

        let mut scored: Vec<(Song, f64, bool)> = repo
            .get_songs()
            .into_iter()
            // rows missing either display field are repair material for the
            // dashboard, not search results
            .filter(|song| song.title.is_some() && song.primary_artist.is_some())
            .filter_map(|song| {
                let title = song.title.as_deref().unwrap_or("");
                let artist = song.primary_artist.as_deref().unwrap_or("");
                let score = similarity(title, term).max(similarity(artist, term));
                if score > RELEVANCE_THRESHOLD {
                    let title_contains = title.to_lowercase().contains(&needle);
                    Some((song, score, title_contains))
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.2.cmp(&a.2)
                .then(b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
        });
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(song, _, _)| {
                let aliases = repo.get_song_aliases(song.id);
                SongSearchResult {
                    id: song.id,
                    title: song.title,
                    primary_artist: song.primary_artist,
                    alias_status: AliasStatus::from_aliases(&aliases),
                    canonical_song_id: song.canonical_song_id,
                }
            })
            .collect()
    }

    /// Same shape as [`search_songs`](Self::search_songs), scored on the
    /// artist name alone; the priority group is a name-prefix match.
    pub fn search_artists(
        &self,
        repo: &dyn MetadataRepository,
        term: &str,
        limit: Option<usize>,
    ) -> Vec<ArtistSearchResult> {
        if Self::query_too_short(term) {
            return Vec::new();
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let needle = term.trim().to_lowercase();

        let mut scored: Vec<(Artist, f64, bool)> = repo
            .get_artists()
            .into_iter()
            .filter_map(|artist| {
                let score = similarity(&artist.name, term);
                if score > RELEVANCE_THRESHOLD {
                    let prefix = artist.name.to_lowercase().starts_with(&needle);
                    Some((artist, score, prefix))
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.2.cmp(&a.2)
                .then(b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
        });
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(artist, _, _)| {
                let aliases = repo.get_artist_aliases(artist.id);
                ArtistSearchResult {
                    song_count: repo.artist_relation_count(artist.id),
                    alias_status: AliasStatus::from_aliases(&aliases),
                    id: artist.id,
                    name: artist.name,
                }
            })
            .collect()
    }

    /// Aliases and sibling songs for one song. An unknown id yields the
    /// null-data shell.
    pub fn song_variants(&self, repo: &dyn MetadataRepository, id: u32) -> SongVariants {
        let Some(song) = repo.get_song(id) else {
            return SongVariants { song_data: None };
        };

        let aliases = repo
            .get_song_aliases(id)
            .into_iter()
            .map(|alias| AliasEntry {
                alias,
                alias_kind: "Direct Alias".to_string(),
            })
            .collect();

        let title = song.title.as_deref().unwrap_or("");
        let sibling_songs = repo
            .get_songs()
            .into_iter()
            .filter(|other| other.id != id)
            .filter(|other| {
                match (&song.primary_artist, &other.primary_artist) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            })
            .filter(|other| {
                let other_title = other.title.as_deref().unwrap_or("");
                similarity(title, other_title) > SIBLING_SIMILARITY_THRESHOLD
            })
            .map(|other| SiblingSong {
                id: other.id,
                title: other.title,
                primary_artist: other.primary_artist,
                relation: "Sibling Song".to_string(),
            })
            .collect();

        SongVariants {
            song_data: Some(SongVariantData {
                original: SongIdentity {
                    id: song.id,
                    title: song.title,
                    primary_artist: song.primary_artist,
                    canonical_song_id: song.canonical_song_id,
                },
                aliases,
                sibling_songs,
            }),
        }
    }

    /// Aliases, relation stats and sample songs for one artist.
    ///
    /// Sample songs come from the primary-artist text field, so every one
    /// of them is reported as primary. That simplification is inherited
    /// from the derivation, not a claim about the relation rows.
    pub fn artist_variants(&self, repo: &dyn MetadataRepository, id: u32) -> ArtistVariants {
        let Some(artist) = repo.get_artist(id) else {
            return ArtistVariants { artist_data: None };
        };

        let aliases = repo
            .get_artist_aliases(id)
            .into_iter()
            .map(|alias| AliasEntry {
                alias,
                alias_kind: "Direct Alias".to_string(),
            })
            .collect();

        let relations = repo.get_relations();
        let mine: Vec<_> = relations.iter().filter(|r| r.artist_id == id).collect();
        let primary_songs = mine.iter().filter(|r| r.is_primary).count();
        let song_stats = ArtistSongStats {
            total_songs: mine.len(),
            primary_songs,
            featured_songs: mine.len() - primary_songs,
        };

        let sample_songs = repo
            .get_songs()
            .into_iter()
            .filter(|s| s.primary_artist.as_deref() == Some(artist.name.as_str()))
            .take(SAMPLE_SONGS_LIMIT)
            .map(|s| SampleSong {
                id: s.id,
                title: s.title,
                is_primary: true,
            })
            .collect();

        ArtistVariants {
            artist_data: Some(ArtistVariantData {
                original: ArtistIdentity {
                    id: artist.id,
                    name: artist.name,
                },
                aliases,
                song_stats,
                sample_songs,
            }),
        }
    }

    /// Containment search combined with conjunctive optional filters.
    /// Songs and artists are computed independently, each capped at the
    /// requested limit.
    pub fn advanced_search(
        &self,
        repo: &dyn MetadataRepository,
        query: &AdvancedSearchQuery,
    ) -> AdvancedSearchResults {
        let limit = query.limit.unwrap_or(DEFAULT_ADVANCED_LIMIT);
        let needle = query.query.trim().to_lowercase();
        let genre_needle = query.genre.as_ref().map(|g| g.trim().to_lowercase());

        let songs = repo
            .get_songs()
            .into_iter()
            .filter(|song| {
                let title = song.title.as_deref().unwrap_or("").to_lowercase();
                let artist = song.primary_artist.as_deref().unwrap_or("").to_lowercase();
                title.contains(&needle) || artist.contains(&needle)
            })
            .filter(|song| match query.release_year {
                Some(year) => song.release_year == Some(year),
                None => true,
            })
            .filter(|song| match &genre_needle {
                Some(needle) => song
                    .genre
                    .as_deref()
                    .map(|g| g.to_lowercase().contains(needle))
                    .unwrap_or(false),
                None => true,
            })
            .filter(|song| match query.collaboration {
                Some(CollaborationFilter::Solo) => repo.song_relation_count(song.id) == 1,
                Some(CollaborationFilter::Collaboration) => repo.song_relation_count(song.id) > 1,
                None => true,
            })
            .take(limit)
            .map(|song| {
                let aliases = repo.get_song_aliases(song.id);
                SongSearchResult {
                    id: song.id,
                    title: song.title,
                    primary_artist: song.primary_artist,
                    alias_status: AliasStatus::from_aliases(&aliases),
                    canonical_song_id: song.canonical_song_id,
                }
            })
            .collect();

        let artists = repo
            .get_artists()
            .into_iter()
            .filter(|artist| artist.name.to_lowercase().contains(&needle))
            .map(|artist| {
                let song_count = repo.artist_relation_count(artist.id);
                (artist, song_count)
            })
            .filter(|(_, song_count)| {
                query.min_song_count.map_or(true, |min| *song_count >= min)
                    && query.max_song_count.map_or(true, |max| *song_count <= max)
            })
            .take(limit)
            .map(|(artist, song_count)| {
                let aliases = repo.get_artist_aliases(artist.id);
                ArtistSearchResult {
                    id: artist.id,
                    name: artist.name,
                    alias_status: AliasStatus::from_aliases(&aliases),
                    song_count,
                }
            })
            .collect();

        AdvancedSearchResults { songs, artists }
    }

    /// Up to three song-title and three artist-name substring matches,
    /// each with a type tag and display subtext.
    pub fn suggestions(&self, repo: &dyn MetadataRepository, term: &str) -> Vec<Suggestion> {
        if Self::query_too_short(term) {
            return Vec::new();
        }
        let needle = term.trim().to_lowercase();
        let mut out = Vec::new();

        for song in repo.get_songs() {
            if out.len() >= SUGGESTION_LIMIT {
                break;
            }
            let Some(title) = song.title.as_deref() else {
                continue;
            };
            if title.to_lowercase().contains(&needle) {
                let by = song
                    .primary_artist
                    .as_deref()
                    .unwrap_or("Unknown Artist");
                out.push(Suggestion {
                    kind: SuggestionKind::Song,
                    id: song.id,
                    text: title.to_string(),
                    subtext: format!("by {}", by),
                });
            }
        }

        let mut artist_hits = 0;
        for artist in repo.get_artists() {
            if artist_hits >= SUGGESTION_LIMIT {
                break;
            }
            if artist.name.to_lowercase().contains(&needle) {
                artist_hits += 1;
                let song_count = repo.artist_relation_count(artist.id);
                out.push(Suggestion {
                    kind: SuggestionKind::Artist,
                    id: artist.id,
                    text: artist.name,
                    subtext: format!("{} songs", song_count),
                });
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{seed_repository, InMemoryRepository, NullRepository};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn mini_song(id: u32, title: &str, artist: &str) -> Song {
        Song {
            id,
            title: Some(title.to_string()),
            primary_artist: Some(artist.to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            featured_artists: Vec::new(),
            genre: None,
            release_year: None,
            album: None,
            canonical_song_id: None,
        }
    }

    fn mini_repo() -> InMemoryRepository {
        let artists = vec![
            Artist { id: 1, name: "Taylor Swift".into() },
            Artist { id: 2, name: "Stay Golden".into() },
            Artist { id: 3, name: "Portrayal".into() },
        ];
        let songs = vec![
            mini_song(1, "Love Story", "Taylor Swift"),
            mini_song(2, "Staying Power", "Stay Golden"),
        ];
        let relations = vec![
            SongArtistRelation { song_id: 1, artist_id: 1, is_primary: true, artist_order: 0 },
            SongArtistRelation { song_id: 2, artist_id: 2, is_primary: true, artist_order: 0 },
        ];
        InMemoryRepository::new(songs, artists, relations, BTreeMap::new(), BTreeMap::new())
    }

    #[test]
    fn short_query_returns_nothing() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        assert!(engine.search_songs(&repo, "a", None).is_empty());
        assert!(engine.search_songs(&repo, " x ", None).is_empty());
        assert!(engine.search_artists(&repo, "", None).is_empty());
        assert!(engine.suggestions(&repo, "z").is_empty());
    }

    #[test]
    fn short_query_skips_catalog_entirely() {
        // NullRepository would return nothing anyway; the point is that
        // the floor applies before any catalog access.
        let engine = SearchEngine::new();
        assert!(engine.search_songs(&NullRepository, "a", None).is_empty());
        assert!(engine.search_artists(&NullRepository, "a", None).is_empty());
    }

    #[test]
    fn results_respect_limit() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let results = engine.search_songs(&repo, "the", Some(2));
        assert!(results.len() <= 2);
    }

    #[test]
    fn all_results_beat_the_threshold() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        for result in engine.search_songs(&repo, "northern", None) {
            let song = repo.get_song(result.id).unwrap();
            let title = song.title.as_deref().unwrap_or("");
            let artist = song.primary_artist.as_deref().unwrap_or("");
            let score = similarity(title, "northern").max(similarity(artist, "northern"));
            assert!(score > RELEVANCE_THRESHOLD, "song {} scored {}", result.id, score);
        }
    }

    #[test]
    fn title_containment_group_sorts_first() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let results = engine.search_songs(&repo, "light", None);
        assert!(!results.is_empty());
        let needle = "light";
        let mut seen_non_containing = false;
        for result in &results {
            let contains = result
                .title
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(needle);
            if !contains {
                seen_non_containing = true;
            } else {
                assert!(
                    !seen_non_containing,
                    "containment hit after a non-containment hit: {:?}",
                    result.title
                );
            }
        }
    }

    #[test]
    fn prefix_artist_match_ranks_first() {
        let engine = SearchEngine::new();
        let repo = mini_repo();
        let results = engine.search_artists(&repo, "tay", Some(10));
        assert!(!results.is_empty());
        assert_eq!(results[0].name, "Taylor Swift");
    }

    #[test]
    fn artist_results_carry_song_count() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let results = engine.search_artists(&repo, "velvet", None);
        let atlas = results.iter().find(|a| a.name == "Velvet Atlas").unwrap();
        assert_eq!(atlas.song_count, 5);
        assert_eq!(atlas.alias_status, AliasStatus::NoAliases);
    }

    #[test]
    fn unknown_song_variants_are_a_null_shell() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let variants = engine.song_variants(&repo, 424242);
        assert!(variants.song_data.is_none());
        let variants = engine.artist_variants(&repo, 424242);
        assert!(variants.artist_data.is_none());
    }

    #[test]
    fn sibling_songs_need_same_artist_and_similar_title() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let variants = engine.song_variants(&repo, 1).song_data.unwrap();
        let siblings: Vec<_> = variants.sibling_songs.iter().map(|s| s.id).collect();
        // the acoustic take is a sibling, the untitled Aurora Vale row is not
        assert_eq!(siblings, vec![2]);
        assert_eq!(variants.sibling_songs[0].relation, "Sibling Song");
    }

    #[test]
    fn song_aliases_are_tagged_direct() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let variants = engine.song_variants(&repo, 1).song_data.unwrap();
        assert_eq!(variants.aliases.len(), 2);
        assert!(variants.aliases.iter().all(|a| a.alias_kind == "Direct Alias"));
    }

    #[test]
    fn artist_variants_report_relation_split() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let data = engine.artist_variants(&repo, 7).artist_data.unwrap();
        assert_eq!(data.original.name, "Velvet Atlas");
        assert_eq!(data.song_stats.total_songs, 5);
        assert_eq!(data.song_stats.primary_songs, 3);
        assert_eq!(data.song_stats.featured_songs, 2);
        assert!(data.sample_songs.len() <= 10);
        assert!(data.sample_songs.iter().all(|s| s.is_primary));
    }

    #[test]
    fn advanced_search_filters_conjunctively() {
        let engine = SearchEngine::new();
        let repo = seed_repository();

        let query = AdvancedSearchQuery {
            query: "e".into(),
            release_year: Some(2024),
            genre: Some("electronic".into()),
            ..Default::default()
        };
        let results = engine.advanced_search(&repo, &query);
        for song in &results.songs {
            let full = repo.get_song(song.id).unwrap();
            assert_eq!(full.release_year, Some(2024));
            assert_eq!(full.genre.as_deref(), Some("Electronic"));
        }
        assert!(!results.songs.is_empty());
    }

    #[test]
    fn advanced_search_collaboration_bucket() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let query = AdvancedSearchQuery {
            query: String::new(),
            collaboration: Some(CollaborationFilter::Collaboration),
            ..Default::default()
        };
        let results = engine.advanced_search(&repo, &query);
        for song in &results.songs {
            assert!(repo.song_relation_count(song.id) > 1, "song {}", song.id);
        }
    }

    #[test]
    fn advanced_search_bounds_artist_song_count() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let query = AdvancedSearchQuery {
            query: String::new(),
            min_song_count: Some(3),
            max_song_count: Some(4),
            ..Default::default()
        };
        let results = engine.advanced_search(&repo, &query);
        assert!(!results.artists.is_empty());
        for artist in &results.artists {
            assert!((3..=4).contains(&artist.song_count), "{}", artist.name);
        }
    }

    #[test]
    fn suggestions_cap_per_category() {
        let engine = SearchEngine::new();
        let repo = seed_repository();
        let suggestions = engine.suggestions(&repo, "er");
        let songs = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Song)
            .count();
        let artists = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Artist)
            .count();
        assert!(songs <= 3);
        assert!(artists <= 3);
        for s in &suggestions {
            match s.kind {
                SuggestionKind::Song => assert!(s.subtext.starts_with("by ")),
                SuggestionKind::Artist => assert!(s.subtext.ends_with(" songs")),
            }
        }
    }
}
