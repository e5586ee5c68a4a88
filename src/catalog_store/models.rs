//! Catalog entity models and their serialized forms.
//!
//! The plain entity structs mirror the table rows. The `Resolved` variants
//! are the API response shapes: foreign keys expanded one level deep and
//! relationship lists embedded as minimal id projections.

use serde::{Deserialize, Serialize};

// =============================================================================
// Core Entities
// =============================================================================

/// Artist entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub bio: String,
}

/// Song entity (scalar fields only, artist reference as plain id)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub album: String,
    pub length: i64,
    pub artist_id: i64,
}

/// Genre entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub description: String,
}

// =============================================================================
// Relationship Projections
// =============================================================================

/// One song→genre membership edge, as embedded in a serialized song.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreMembership {
    pub genre_id: i64,
}

/// One genre→song membership edge, as embedded in a serialized genre.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongMembership {
    pub song_id: i64,
}

// =============================================================================
// Resolved/Composite Types (API Responses)
// =============================================================================

/// Artist with embedded songs, the list-item serialization.
///
/// Deliberately carries no `song_count`: only the single-item retrieve
/// computes it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistWithSongs {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub bio: String,
    pub songs: Vec<Song>,
}

/// Artist with embedded songs plus the computed song count, the
/// single-item retrieve serialization.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedArtist {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub bio: String,
    pub song_count: i64,
    pub songs: Vec<Song>,
}

/// Song with its artist expanded one level and genre memberships embedded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedSong {
    pub id: i64,
    pub title: String,
    // The wire format keeps the foreign-key name but carries the expanded artist.
    #[serde(rename = "artist_id")]
    pub artist: Artist,
    pub album: String,
    pub length: i64,
    pub genres: Vec<GenreMembership>,
}

/// Genre with its song memberships embedded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedGenre {
    pub id: i64,
    pub description: String,
    pub songs: Vec<SongMembership>,
}

// =============================================================================
// Write Inputs
// =============================================================================

/// Mutable fields of an artist; updates replace all of them.
#[derive(Clone, Debug)]
pub struct ArtistFields {
    pub name: String,
    pub age: i64,
    pub bio: String,
}

/// Mutable fields of a song.
///
/// `genre_ids` is the optional replacement set for the song's genre
/// memberships: `None` leaves existing memberships untouched.
#[derive(Clone, Debug)]
pub struct SongFields {
    pub title: String,
    pub album: String,
    pub length: i64,
    pub artist_id: i64,
    pub genre_ids: Option<Vec<i64>>,
}

/// Mutable fields of a genre.
#[derive(Clone, Debug)]
pub struct GenreFields {
    pub description: String,
}
