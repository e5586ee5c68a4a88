//! Test fixture creation for the catalog database
//!
//! The seed goes through the store API rather than raw SQL so fixtures stay
//! valid when the schema evolves. SQLite assigns rowids sequentially on a
//! fresh database, which is what pins the id constants.

use super::constants::*;
use anyhow::Result;
use tuna_catalog_server::catalog_store::{
    ArtistFields, ArtistStore, GenreFields, GenreStore, SongFields, SongStore,
    SqliteCatalogStore,
};

/// Seeds the catalog with 2 artists, 2 genres and 3 songs.
///
/// Expected ids after seeding a fresh database: artists 1-2, genres 1-2,
/// songs 1-3 (see constants.rs).
pub fn seed_catalog(store: &SqliteCatalogStore) -> Result<()> {
    store.create_artist(&ArtistFields {
        name: ARTIST_1_NAME.to_string(),
        age: ARTIST_1_AGE,
        bio: ARTIST_1_BIO.to_string(),
    })?;
    store.create_artist(&ArtistFields {
        name: ARTIST_2_NAME.to_string(),
        age: ARTIST_2_AGE,
        bio: ARTIST_2_BIO.to_string(),
    })?;

    store.create_genre(&GenreFields {
        description: GENRE_1_DESCRIPTION.to_string(),
    })?;
    store.create_genre(&GenreFields {
        description: GENRE_2_DESCRIPTION.to_string(),
    })?;

    store.create_song(&SongFields {
        title: SONG_1_TITLE.to_string(),
        album: SONG_1_ALBUM.to_string(),
        length: SONG_1_LENGTH,
        artist_id: ARTIST_1_ID,
        genre_ids: Some(vec![GENRE_1_ID]),
    })?;
    store.create_song(&SongFields {
        title: SONG_2_TITLE.to_string(),
        album: SONG_2_ALBUM.to_string(),
        length: SONG_2_LENGTH,
        artist_id: ARTIST_1_ID,
        genre_ids: Some(vec![GENRE_1_ID, GENRE_2_ID]),
    })?;
    store.create_song(&SongFields {
        title: SONG_3_TITLE.to_string(),
        album: SONG_3_ALBUM.to_string(),
        length: SONG_3_LENGTH,
        artist_id: ARTIST_2_ID,
        genre_ids: None,
    })?;

    Ok(())
}
