//! Dashboard stat groups computed over the repository.
//!
//! Each function mirrors one aggregate query of the metadata database.
//! All of them are pure reads; nothing here ever fails.

use super::models::*;
use super::repository::MetadataRepository;
use std::collections::{BTreeMap, HashMap, HashSet};

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn db_stats(repo: &dyn MetadataRepository) -> DbStats {
    let relations = repo.get_relations();
    let primary = relations.iter().filter(|r| r.is_primary).count();
    DbStats {
        songs: repo.get_songs_count(),
        artists: repo.get_artists_count(),
        song_artist_relations: relations.len(),
        primary_artists: primary,
        featured_artists: relations.len() - primary,
        song_aliases: repo.get_song_alias_map().values().map(Vec::len).sum(),
        artist_aliases: repo.get_artist_alias_map().values().map(Vec::len).sum(),
    }
}

pub fn secondary_stats(repo: &dyn MetadataRepository) -> SecondaryStats {
    let songs = repo.get_songs();
    let relations = repo.get_relations();
    let artist_by_name: HashMap<String, u32> = repo
        .get_artists()
        .iter()
        .map(|a| (norm(&a.name), a.id))
        .collect();

    let mut songs_with_secondary = 0;
    let mut unique_names: HashSet<String> = HashSet::new();
    let mut total_mentions = 0;
    let mut existing = 0;
    let mut missing_from_table = 0;
    let mut missing_relationships = 0;

    for song in &songs {
        let mentions: Vec<&String> = song
            .featured_artists
            .iter()
            .filter(|m| !m.trim().is_empty())
            .collect();
        if mentions.is_empty() {
            continue;
        }
        songs_with_secondary += 1;
        for mention in mentions {
            total_mentions += 1;
            let key = norm(mention);
            unique_names.insert(key.clone());
            match artist_by_name.get(&key) {
                Some(&artist_id) => {
                    existing += 1;
                    let has_relation = relations.iter().any(|r| {
                        r.song_id == song.id && r.artist_id == artist_id && r.artist_order > 0
                    });
                    if !has_relation {
                        missing_relationships += 1;
                    }
                }
                None => {
                    missing_from_table += 1;
                    // no artist row means no relation row either
                    missing_relationships += 1;
                }
            }
        }
    }

    SecondaryStats {
        songs_with_secondary,
        unique_secondary_count: unique_names.len(),
        total_secondary_mentions: total_mentions,
        existing_in_artist_table: existing,
        missing_from_artist_table: missing_from_table,
        missing_relationships,
    }
}

pub fn deduplication_stats(repo: &dyn MetadataRepository) -> DeduplicationStats {
    let songs = repo.get_songs();
    let song_alias_map = repo.get_song_alias_map();
    let artist_alias_map = repo.get_artist_alias_map();

    let songs_without_aliases = songs
        .iter()
        .filter(|s| !song_alias_map.contains_key(&s.id))
        .count();
    let artists_without_aliases = repo
        .get_artists()
        .iter()
        .filter(|a| !artist_alias_map.contains_key(&a.id))
        .count();
    let canonical_mappings: HashSet<u32> =
        songs.iter().filter_map(|s| s.canonical_song_id).collect();

    DeduplicationStats {
        song_aliases: song_alias_map.values().map(Vec::len).sum(),
        artist_aliases: artist_alias_map.values().map(Vec::len).sum(),
        songs_without_aliases,
        canonical_mappings: canonical_mappings.len(),
        artists_without_aliases,
    }
}

pub fn database_issues(repo: &dyn MetadataRepository) -> DatabaseIssues {
    let songs = repo.get_songs();
    let relations = repo.get_relations();
    let artists = repo.get_artists();
    let artist_alias_map = repo.get_artist_alias_map();

    let song_ids_with_relations: HashSet<u32> = relations.iter().map(|r| r.song_id).collect();
    let orphaned_songs = songs
        .iter()
        .filter(|s| !song_ids_with_relations.contains(&s.id))
        .count();

    // A song with relations but none flagged primary counts here too,
    // as does a song with no relations at all.
    let songs_with_primary: HashSet<u32> = relations
        .iter()
        .filter(|r| r.is_primary)
        .map(|r| r.song_id)
        .collect();
    let missing_primary = songs
        .iter()
        .filter(|s| !songs_with_primary.contains(&s.id))
        .count();

    // Headline-slot relation pointing at an artist whose name does not
    // match the song's primary-artist text, and no alias excuses it.
    let mut inconsistent_artists = 0;
    for song in &songs {
        let Some(artist_0) = song.primary_artist.as_deref() else {
            continue;
        };
        if artist_0.trim().is_empty() {
            continue;
        }
        let mismatched = relations
            .iter()
            .filter(|r| r.song_id == song.id && r.artist_order == 0)
            .filter_map(|r| artists.iter().find(|a| a.id == r.artist_id))
            .any(|artist| {
                if norm(&artist.name) == norm(artist_0) {
                    return false;
                }
                let excused = artist_alias_map
                    .get(&artist.id)
                    .map(|aliases| aliases.iter().any(|al| norm(al) == norm(artist_0)))
                    .unwrap_or(false);
                !excused
            });
        if mismatched {
            inconsistent_artists += 1;
        }
    }

    let mut pair_counts: HashMap<(u32, u32), usize> = HashMap::new();
    for r in &relations {
        *pair_counts.entry((r.song_id, r.artist_id)).or_default() += 1;
    }
    let duplicate_relations = pair_counts.values().filter(|&&c| c > 1).count();

    let song_ids: HashSet<u32> = songs.iter().map(|s| s.id).collect();
    let orphaned_aliases = repo
        .get_song_alias_map()
        .iter()
        .filter(|(song_id, _)| !song_ids.contains(song_id))
        .map(|(_, aliases)| aliases.len())
        .sum();

    let null_values = songs
        .iter()
        .filter(|s| s.title.is_none() || s.primary_artist.is_none())
        .count();

    DatabaseIssues {
        orphaned_songs,
        missing_primary,
        inconsistent_artists,
        duplicate_relations,
        orphaned_aliases,
        null_values,
    }
}

pub fn recent_songs(repo: &dyn MetadataRepository) -> Vec<RecentSong> {
    let relations = repo.get_relations();
    let mut songs = repo.get_songs();
    songs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    songs
        .into_iter()
        .take(10)
        .map(|s| {
            let artist_count = relations.iter().filter(|r| r.song_id == s.id).count();
            RecentSong {
                id: s.id,
                title: s.title,
                primary_artist: s.primary_artist,
                created_at: s.created_at,
                artist_count,
            }
        })
        .collect()
}

pub fn top_artists(repo: &dyn MetadataRepository) -> Vec<TopArtist> {
    let relations = repo.get_relations();
    let mut rows: Vec<TopArtist> = repo
        .get_artists()
        .into_iter()
        .filter_map(|artist| {
            let mine: Vec<_> = relations
                .iter()
                .filter(|r| r.artist_id == artist.id)
                .collect();
            if mine.is_empty() {
                return None;
            }
            let primary_count = mine.iter().filter(|r| r.is_primary).count();
            Some(TopArtist {
                id: artist.id,
                name: artist.name,
                song_count: mine.len(),
                primary_count,
                featured_count: mine.len() - primary_count,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.song_count.cmp(&a.song_count).then(a.id.cmp(&b.id)));
    rows.truncate(10);
    rows
}

fn buckets(counts: &[(String, usize)]) -> Vec<DistributionBucket> {
    counts
        .iter()
        .filter(|(_, v)| *v > 0)
        .map(|(name, value)| DistributionBucket {
            name: name.clone(),
            value: *value,
        })
        .collect()
}

pub fn distribution_data(repo: &dyn MetadataRepository) -> DistributionData {
    let relations = repo.get_relations();

    let mut per_song: HashMap<u32, usize> = HashMap::new();
    for r in &relations {
        *per_song.entry(r.song_id).or_default() += 1;
    }
    let mut artist_bins = [0usize; 4];
    for &count in per_song.values() {
        match count {
            1 => artist_bins[0] += 1,
            2 => artist_bins[1] += 1,
            3 => artist_bins[2] += 1,
            _ => artist_bins[3] += 1,
        }
    }

    let mut per_artist: HashMap<u32, usize> = HashMap::new();
    for r in &relations {
        *per_artist.entry(r.artist_id).or_default() += 1;
    }
    let mut song_bins = [0usize; 5];
    for &count in per_artist.values() {
        match count {
            1 => song_bins[0] += 1,
            2..=4 => song_bins[1] += 1,
            5..=9 => song_bins[2] += 1,
            10..=19 => song_bins[3] += 1,
            _ => song_bins[4] += 1,
        }
    }

    DistributionData {
        artists_per_song: buckets(&[
            ("1 artist".into(), artist_bins[0]),
            ("2 artists".into(), artist_bins[1]),
            ("3 artists".into(), artist_bins[2]),
            ("4+ artists".into(), artist_bins[3]),
        ]),
        songs_per_artist: buckets(&[
            ("1 song".into(), song_bins[0]),
            ("2-4 songs".into(), song_bins[1]),
            ("5-9 songs".into(), song_bins[2]),
            ("10-19 songs".into(), song_bins[3]),
            ("20+ songs".into(), song_bins[4]),
        ]),
    }
}

pub fn year_distribution(repo: &dyn MetadataRepository) -> Vec<YearCount> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for song in repo.get_songs() {
        if let Some(year) = song.release_year {
            *by_year.entry(year).or_default() += 1;
        }
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

pub fn top_genres(repo: &dyn MetadataRepository) -> Vec<GenreCount> {
    let mut by_genre: BTreeMap<String, usize> = BTreeMap::new();
    for song in repo.get_songs() {
        if let Some(genre) = song.genre {
            *by_genre.entry(genre).or_default() += 1;
        }
    }
    let mut rows: Vec<GenreCount> = by_genre
        .into_iter()
        .map(|(name, count)| GenreCount { name, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(&b.name)));
    rows.truncate(8);
    rows
}

pub fn health_score(repo: &dyn MetadataRepository) -> HealthScore {
    let total_songs = repo.get_songs_count();
    let total_artists = repo.get_artists_count();
    let issues = database_issues(repo);
    let primary_relationships = repo
        .get_relations()
        .iter()
        .filter(|r| r.is_primary)
        .count();

    let denom = total_songs.max(1) as f64;
    let completeness_score = primary_relationships as f64 / denom * 100.0;
    let data_quality_score = (100.0 - issues.null_values as f64 / denom * 100.0).max(0.0);
    let relationship_score = (100.0 - issues.orphaned_songs as f64 / denom * 100.0).max(0.0);
    let overall_health =
        completeness_score * 0.4 + data_quality_score * 0.3 + relationship_score * 0.3;

    HealthScore {
        overall_health,
        completeness_score,
        data_quality_score,
        relationship_score,
        total_songs,
        total_artists,
        primary_relationships,
        null_values: issues.null_values,
        orphaned_songs: issues.orphaned_songs,
    }
}
