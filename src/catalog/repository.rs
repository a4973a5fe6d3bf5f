//! Read-only repository over the metadata collections.
//!
//! The repository is constructed once at startup and handed to the search
//! engine, stats, and HTTP handlers by parameter. Lookups never fail:
//! "not found" is `None` or an empty list, so swapping the in-memory
//! fixture for a real data source is a matter of implementing this trait.

use super::models::{Artist, Song, SongArtistRelation};
use std::collections::BTreeMap;

pub trait MetadataRepository: Send + Sync {
    fn get_song(&self, id: u32) -> Option<Song>;
    fn get_artist(&self, id: u32) -> Option<Artist>;

    fn get_songs(&self) -> Vec<Song>;
    fn get_artists(&self) -> Vec<Artist>;
    fn get_relations(&self) -> Vec<SongArtistRelation>;

    /// Ordered alias list for a song; empty when the song has none (or
    /// does not exist).
    fn get_song_aliases(&self, song_id: u32) -> Vec<String>;
    fn get_artist_aliases(&self, artist_id: u32) -> Vec<String>;

    /// The full alias maps, including entries whose owning record no
    /// longer exists (those are exactly what the orphaned-alias counter
    /// is after).
    fn get_song_alias_map(&self) -> BTreeMap<u32, Vec<String>>;
    fn get_artist_alias_map(&self) -> BTreeMap<u32, Vec<String>>;

    fn get_songs_count(&self) -> usize;
    fn get_artists_count(&self) -> usize;

    /// Number of relation rows for a song.
    fn song_relation_count(&self, song_id: u32) -> usize {
        self.get_relations()
            .iter()
            .filter(|r| r.song_id == song_id)
            .count()
    }

    /// Number of relation rows for an artist.
    fn artist_relation_count(&self, artist_id: u32) -> usize {
        self.get_relations()
            .iter()
            .filter(|r| r.artist_id == artist_id)
            .count()
    }
}

/// In-memory repository backed by plain vectors, seeded from the fixture.
pub struct InMemoryRepository {
    songs: Vec<Song>,
    artists: Vec<Artist>,
    relations: Vec<SongArtistRelation>,
    song_aliases: BTreeMap<u32, Vec<String>>,
    artist_aliases: BTreeMap<u32, Vec<String>>,
}

impl InMemoryRepository {
    pub fn new(
        songs: Vec<Song>,
        artists: Vec<Artist>,
        relations: Vec<SongArtistRelation>,
        song_aliases: BTreeMap<u32, Vec<String>>,
        artist_aliases: BTreeMap<u32, Vec<String>>,
    ) -> Self {
        Self {
            songs,
            artists,
            relations,
            song_aliases,
            artist_aliases,
        }
    }

    /// The deterministic demo catalog.
    pub fn with_fixture() -> Self {
        super::fixture::seed_repository()
    }
}

impl MetadataRepository for InMemoryRepository {
    fn get_song(&self, id: u32) -> Option<Song> {
        self.songs.iter().find(|s| s.id == id).cloned()
    }

    fn get_artist(&self, id: u32) -> Option<Artist> {
        self.artists.iter().find(|a| a.id == id).cloned()
    }

    fn get_songs(&self) -> Vec<Song> {
        self.songs.clone()
    }

    fn get_artists(&self) -> Vec<Artist> {
        self.artists.clone()
    }

    fn get_relations(&self) -> Vec<SongArtistRelation> {
        self.relations.clone()
    }

    fn get_song_aliases(&self, song_id: u32) -> Vec<String> {
        self.song_aliases.get(&song_id).cloned().unwrap_or_default()
    }

    fn get_artist_aliases(&self, artist_id: u32) -> Vec<String> {
        self.artist_aliases
            .get(&artist_id)
            .cloned()
            .unwrap_or_default()
    }

    fn get_song_alias_map(&self) -> BTreeMap<u32, Vec<String>> {
        self.song_aliases.clone()
    }

    fn get_artist_alias_map(&self) -> BTreeMap<u32, Vec<String>> {
        self.artist_aliases.clone()
    }

    fn get_songs_count(&self) -> usize {
        self.songs.len()
    }

    fn get_artists_count(&self) -> usize {
        self.artists.len()
    }
}

/// Empty repository, handy as a stand-in where the catalog is irrelevant.
pub struct NullRepository;

impl MetadataRepository for NullRepository {
    fn get_song(&self, _id: u32) -> Option<Song> {
        None
    }

    fn get_artist(&self, _id: u32) -> Option<Artist> {
        None
    }

    fn get_songs(&self) -> Vec<Song> {
        Vec::new()
    }

    fn get_artists(&self) -> Vec<Artist> {
        Vec::new()
    }

    fn get_relations(&self) -> Vec<SongArtistRelation> {
        Vec::new()
    }

    fn get_song_aliases(&self, _song_id: u32) -> Vec<String> {
        Vec::new()
    }

    fn get_artist_aliases(&self, _artist_id: u32) -> Vec<String> {
        Vec::new()
    }

    fn get_song_alias_map(&self) -> BTreeMap<u32, Vec<String>> {
        BTreeMap::new()
    }

    fn get_artist_alias_map(&self) -> BTreeMap<u32, Vec<String>> {
        BTreeMap::new()
    }

    fn get_songs_count(&self) -> usize {
        0
    }

    fn get_artists_count(&self) -> usize {
        0
    }
}

impl<T: MetadataRepository + ?Sized> MetadataRepository for std::sync::Arc<T> {
    fn get_song(&self, id: u32) -> Option<Song> {
        (**self).get_song(id)
    }

    fn get_artist(&self, id: u32) -> Option<Artist> {
        (**self).get_artist(id)
    }

    fn get_songs(&self) -> Vec<Song> {
        (**self).get_songs()
    }

    fn get_artists(&self) -> Vec<Artist> {
        (**self).get_artists()
    }

    fn get_relations(&self) -> Vec<SongArtistRelation> {
        (**self).get_relations()
    }

    fn get_song_aliases(&self, song_id: u32) -> Vec<String> {
        (**self).get_song_aliases(song_id)
    }

    fn get_artist_aliases(&self, artist_id: u32) -> Vec<String> {
        (**self).get_artist_aliases(artist_id)
    }

    fn get_song_alias_map(&self) -> BTreeMap<u32, Vec<String>> {
        (**self).get_song_alias_map()
    }

    fn get_artist_alias_map(&self) -> BTreeMap<u32, Vec<String>> {
        (**self).get_artist_alias_map()
    }

    fn get_songs_count(&self) -> usize {
        (**self).get_songs_count()
    }

    fn get_artists_count(&self) -> usize {
        (**self).get_artists_count()
    }
}
