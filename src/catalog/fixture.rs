//! Deterministic demo catalog.
//!
//! The seed data deliberately contains every defect class the dashboard
//! reports on: orphaned songs, songs without a primary relation, duplicate
//! relation rows, aliases pointing at deleted songs, and rows with missing
//! titles or artists. Counts are stable, so tests can assert against them.

use super::models::{Artist, Song, SongArtistRelation};
use super::repository::InMemoryRepository;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

#[allow(clippy::too_many_arguments)]
fn song(
    id: u32,
    title: Option<&str>,
    primary_artist: Option<&str>,
    created_at: DateTime<Utc>,
    featured: &[&str],
    genre: Option<&str>,
    release_year: Option<i32>,
    album: Option<&str>,
    canonical_song_id: Option<u32>,
) -> Song {
    Song {
        id,
        title: title.map(str::to_string),
        primary_artist: primary_artist.map(str::to_string),
        created_at,
        featured_artists: featured.iter().map(|s| s.to_string()).collect(),
        genre: genre.map(str::to_string),
        release_year,
        album: album.map(str::to_string),
        canonical_song_id,
    }
}

fn rel(song_id: u32, artist_id: u32, is_primary: bool, artist_order: u32) -> SongArtistRelation {
    SongArtistRelation {
        song_id,
        artist_id,
        is_primary,
        artist_order,
    }
}

pub fn seed_repository() -> InMemoryRepository {
    let artists = vec![
        Artist { id: 1, name: "Aurora Vale".into() },
        Artist { id: 2, name: "The Midnight Archive".into() },
        Artist { id: 3, name: "Cobalt & Pine".into() },
        Artist { id: 4, name: "Stellar Fox".into() },
        Artist { id: 5, name: "Marrow Lane".into() },
        Artist { id: 6, name: "Iron Meridian".into() },
        Artist { id: 7, name: "Velvet Atlas".into() },
        Artist { id: 8, name: "Paper Saints".into() },
        Artist { id: 9, name: "Taya Reyes".into() },
        Artist { id: 10, name: "Stay Golden".into() },
        Artist { id: 11, name: "Echo District".into() },
        Artist { id: 12, name: "Harbor Light Ensemble".into() },
    ];

    let songs = vec![
        song(1, Some("Northern Lights"), Some("Aurora Vale"), ts(2019, 4, 2), &[], Some("Dream Pop"), Some(2019), Some("Polar Hour"), None),
        song(2, Some("Northern Lights (Acoustic)"), Some("Aurora Vale"), ts(2019, 11, 20), &[], Some("Dream Pop"), Some(2019), Some("Polar Hour Sessions"), Some(1)),
        song(3, Some("Glass Rivers"), Some("The Midnight Archive"), ts(2020, 2, 14), &["Stellar Fox"], Some("Electronic"), Some(2020), Some("Night Index"), None),
        song(4, Some("Paper Planes Over Harbor"), Some("Cobalt & Pine"), ts(2020, 6, 1), &["The Gulls"], Some("Indie Folk"), Some(2020), Some("Driftwood"), None),
        song(5, Some("Ember Waltz"), Some("Marrow Lane"), ts(2020, 9, 9), &[], Some("Chamber Pop"), Some(2020), None, None),
        song(6, Some("Ember Waltz (Live)"), Some("Marrow Lane"), ts(2021, 1, 30), &[], Some("Chamber Pop"), Some(2021), Some("Live at the Arboretum"), Some(5)),
        song(7, Some("Salt and Circuitry"), Some("Iron Meridien"), ts(2021, 3, 17), &[], Some("Post-Rock"), Some(2021), Some("Alloy"), None),
        song(8, Some("Cobalt Morning"), Some("Cobalt & Pine"), ts(2021, 5, 5), &[], Some("Indie Folk"), Some(2021), Some("Driftwood"), None),
        song(9, Some("Vellum"), Some("Velvet Atlas"), ts(2021, 8, 23), &[], Some("Ambient"), Some(2021), None, None),
        song(10, Some("Stay With The Tide"), Some("Stay Golden"), ts(2021, 12, 12), &["Taya Reyes"], Some("Indie Pop"), Some(2021), Some("Undertow"), None),
        song(11, Some("Golden Hour Reprise"), Some("Stay Golden"), ts(2022, 2, 2), &[], Some("Indie Pop"), Some(2022), Some("Undertow"), None),
        song(12, Some("District Nine Nights"), Some("Echo District"), ts(2022, 4, 19), &["Velvet Atlas"], Some("Electronic"), Some(2022), None, None),
        song(13, Some("Harbor Light"), Some("Harbor Light Ensemble"), ts(2022, 7, 7), &[], Some("Jazz"), Some(2022), Some("First Watch"), None),
        song(14, Some("Taya's Theme"), Some("Taya Reyes"), ts(2022, 10, 31), &[], Some("Jazz"), Some(2022), None, None),
        song(15, Some("Meridian Sunrise"), Some("Iron Meridian"), ts(2023, 1, 16), &[], Some("Post-Rock"), Some(2023), Some("Alloy"), None),
        song(16, Some("Archive Fever"), Some("Midnight Archive"), ts(2023, 3, 8), &[], Some("Electronic"), Some(2023), Some("Night Index"), None),
        song(17, None, Some("Aurora Vale"), ts(2023, 5, 25), &[], None, None, None, None),
        song(18, Some("Untitled Session 4"), None, ts(2023, 8, 14), &[], None, Some(2023), None, None),
        song(19, Some("Pine Needle Lullaby"), Some("Cobalt & Pine"), ts(2023, 10, 3), &[], Some("Indie Folk"), Some(2023), None, None),
        song(20, Some("Fox Step"), Some("Stellar Fox"), ts(2023, 12, 1), &["Marrow Lane"], Some("Electronic"), Some(2023), None, None),
        song(21, Some("Midnight Pines"), Some("Cobalt & Pine"), ts(2024, 1, 11), &[], Some("Indie Folk"), Some(2024), None, None),
        song(22, Some("Lighthouse Static"), Some("Echo District"), ts(2024, 2, 28), &[], Some("Ambient"), Some(2024), None, None),
        song(23, Some("Signal Bloom"), Some("Echo District"), ts(2024, 4, 9), &[], Some("Electronic"), Some(2024), None, None),
        song(24, Some("Velvet Dawn"), Some("Velvet Atlas"), ts(2024, 5, 21), &[], Some("Ambient"), Some(2024), Some("Slow Maps"), None),
        song(25, Some("Atlas of Small Hours"), Some("Velvet Atlas"), ts(2024, 6, 30), &[], Some("Ambient"), Some(2024), Some("Slow Maps"), None),
        song(26, Some("Glass Rivers (Radio Edit)"), Some("The Midnight Archive"), ts(2024, 7, 15), &[], Some("Electronic"), Some(2024), None, Some(3)),
    ];

    let relations = vec![
        rel(1, 1, true, 0),
        rel(2, 1, true, 0),
        rel(3, 2, true, 0),
        rel(3, 4, false, 1),
        // duplicate row, kept on purpose
        rel(3, 2, true, 0),
        rel(4, 3, true, 0),
        rel(5, 5, true, 0),
        rel(6, 5, true, 0),
        rel(7, 6, true, 0),
        rel(8, 3, true, 0),
        rel(9, 7, true, 0),
        rel(10, 10, true, 0),
        rel(10, 9, false, 1),
        rel(11, 10, true, 0),
        rel(12, 11, true, 0),
        rel(12, 7, false, 1),
        rel(13, 12, true, 0),
        rel(14, 9, true, 0),
        rel(15, 6, true, 0),
        rel(16, 2, true, 0),
        rel(17, 1, true, 0),
        rel(18, 5, true, 0),
        rel(19, 3, true, 0),
        rel(20, 4, true, 0),
        // songs 21 and 22 have no relations at all
        rel(23, 11, false, 0),
        rel(23, 7, false, 1),
        rel(24, 7, true, 0),
        rel(25, 7, true, 0),
        rel(26, 2, true, 0),
    ];

    let mut song_aliases: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    song_aliases.insert(1, vec!["Northern Lites".into(), "The Lights Song".into()]);
    song_aliases.insert(3, vec!["Rivers of Glass".into()]);
    song_aliases.insert(5, vec!["The Ember Waltz".into()]);
    song_aliases.insert(14, vec!["Theme for Taya".into()]);
    // alias left behind by a deleted song
    song_aliases.insert(999, vec!["Ghost Entry".into()]);

    let mut artist_aliases: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    artist_aliases.insert(1, vec!["A. Vale".into(), "Aurora V.".into()]);
    artist_aliases.insert(2, vec!["Midnight Archive".into()]);
    artist_aliases.insert(9, vec!["T. Reyes".into()]);

    InMemoryRepository::new(songs, artists, relations, song_aliases, artist_aliases)
}

#[cfg(test)]
mod tests {
    use super::super::repository::MetadataRepository;
    use super::*;

    #[test]
    fn fixture_has_expected_shape() {
        let repo = seed_repository();
        assert_eq!(repo.get_songs_count(), 26);
        assert_eq!(repo.get_artists_count(), 12);
        assert!(repo.get_song(1).is_some());
        assert!(repo.get_song(999).is_none());
    }

    #[test]
    fn fixture_contains_orphaned_songs() {
        let repo = seed_repository();
        assert_eq!(repo.song_relation_count(21), 0);
        assert_eq!(repo.song_relation_count(22), 0);
    }

    #[test]
    fn fixture_contains_orphaned_alias() {
        let repo = seed_repository();
        let map = repo.get_song_alias_map();
        assert!(map.contains_key(&999));
        assert!(repo.get_song(999).is_none());
    }
}
