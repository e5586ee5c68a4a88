//! Repository trait definitions.
//!
//! One trait per entity so handlers and tests can depend on narrow
//! interfaces; `CatalogStore` bundles them for the server state, which holds
//! the store as `Arc<dyn CatalogStore>`.

use super::models::*;
use super::StoreResult;

/// Storage operations for the artist resource.
pub trait ArtistStore: Send + Sync {
    /// All artists with their songs embedded, in id order.
    fn list_artists(&self) -> StoreResult<Vec<ArtistWithSongs>>;

    /// A single artist with songs and the computed song count.
    fn get_artist(&self, id: i64) -> StoreResult<Option<ResolvedArtist>>;

    /// Create an artist. Returns the created record with a fresh id.
    fn create_artist(&self, fields: &ArtistFields) -> StoreResult<ArtistWithSongs>;

    /// Replace all mutable fields of an artist.
    fn update_artist(&self, id: i64, fields: &ArtistFields) -> StoreResult<ArtistWithSongs>;

    /// Delete an artist. Fails with `HasDependents` while songs still
    /// reference it.
    fn delete_artist(&self, id: i64) -> StoreResult<()>;

    /// Number of artists in the catalog.
    fn artists_count(&self) -> usize;
}

/// Storage operations for the song resource.
pub trait SongStore: Send + Sync {
    fn list_songs(&self) -> StoreResult<Vec<ResolvedSong>>;

    fn get_song(&self, id: i64) -> StoreResult<Option<ResolvedSong>>;

    /// Create a song. The artist reference (and any genre references) are
    /// resolved inside the same transaction as the insert; a dangling id
    /// fails the whole operation with `MissingReference` and writes nothing.
    fn create_song(&self, fields: &SongFields) -> StoreResult<ResolvedSong>;

    /// Replace all mutable fields of a song, re-resolving the artist
    /// reference. A `Some` genre set replaces the memberships, `None`
    /// leaves them untouched.
    fn update_song(&self, id: i64, fields: &SongFields) -> StoreResult<ResolvedSong>;

    /// Delete a song; its membership edges cascade away.
    fn delete_song(&self, id: i64) -> StoreResult<()>;

    fn songs_count(&self) -> usize;
}

/// Storage operations for the genre resource.
pub trait GenreStore: Send + Sync {
    fn list_genres(&self) -> StoreResult<Vec<ResolvedGenre>>;

    fn get_genre(&self, id: i64) -> StoreResult<Option<ResolvedGenre>>;

    fn create_genre(&self, fields: &GenreFields) -> StoreResult<ResolvedGenre>;

    fn update_genre(&self, id: i64, fields: &GenreFields) -> StoreResult<ResolvedGenre>;

    /// Delete a genre; its membership edges cascade away.
    fn delete_genre(&self, id: i64) -> StoreResult<()>;

    fn genres_count(&self) -> usize;
}

/// Storage operations on song↔genre membership edges.
///
/// Memberships have no endpoint of their own; they are written through the
/// song resource and read through both song and genre serializations.
pub trait JoinStore: Send + Sync {
    /// Replace a song's membership set with the given genres.
    fn set_song_genres(&self, song_id: i64, genre_ids: &[i64]) -> StoreResult<()>;

    /// Membership edges of a song, in genre id order.
    fn get_song_genres(&self, song_id: i64) -> StoreResult<Vec<GenreMembership>>;

    /// Membership edges of a genre, in song id order.
    fn get_genre_songs(&self, genre_id: i64) -> StoreResult<Vec<SongMembership>>;
}

/// The full catalog storage backend.
pub trait CatalogStore: ArtistStore + SongStore + GenreStore + JoinStore {}

impl<T: ArtistStore + SongStore + GenreStore + JoinStore> CatalogStore for T {}
