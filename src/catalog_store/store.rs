//! SQLite-backed catalog store implementation.
//!
//! Reads rotate over a small pool of read-only connections; writes go
//! through a single mutex-guarded read-write connection. Every write that
//! resolves a foreign key does so inside the same transaction as the
//! dependent insert/update, so a dangling reference fails the whole
//! operation and leaves no partial row behind.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::{ArtistStore, GenreStore, JoinStore, SongStore};
use super::{StoreError, StoreResult};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// SQLite-backed catalog store.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn initialize_schema(conn: &mut Connection) -> Result<()> {
    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let mut current_version =
        conn.query_row("PRAGMA user_version", [], |r| r.get::<_, i64>(0))? as usize;

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating catalog db from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
                current_version = schema.version;
            }
        }
        tx.pragma_update(None, "user_version", current_version as i64)?;
        tx.commit()?;
    }

    latest_schema
        .validate(conn)
        .context("Catalog database does not match the expected schema")
}

impl SqliteCatalogStore {
    /// Open (and if necessary create) the catalog database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections for concurrent read operations
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        // Per-connection pragma; required for RESTRICT/CASCADE to apply.
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        initialize_schema(&mut write_conn)?;

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteCatalogStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        };

        info!(
            "Opened tuna catalog: {} artists, {} songs, {} genres",
            store.artists_count(),
            store.songs_count(),
            store.genres_count()
        );

        Ok(store)
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn count_table(&self, table: &str) -> usize {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
            r.get::<_, i64>(0)
        })
        .unwrap_or(0) as usize
    }
}

// =============================================================================
// Row Parsing and Shared Queries
// =============================================================================

fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        bio: row.get(3)?,
    })
}

fn parse_song_row(row: &rusqlite::Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        album: row.get(2)?,
        length: row.get(3)?,
        artist_id: row.get(4)?,
    })
}

fn parse_genre_row(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: row.get(0)?,
        description: row.get(1)?,
    })
}

fn artist_by_id(conn: &Connection, id: i64) -> StoreResult<Option<Artist>> {
    let mut stmt = conn.prepare_cached("SELECT id, name, age, bio FROM artists WHERE id = ?1")?;
    match stmt.query_row(params![id], parse_artist_row) {
        Ok(artist) => Ok(Some(artist)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn song_by_id(conn: &Connection, id: i64) -> StoreResult<Option<Song>> {
    let mut stmt = conn
        .prepare_cached("SELECT id, title, album, length, artist_id FROM songs WHERE id = ?1")?;
    match stmt.query_row(params![id], parse_song_row) {
        Ok(song) => Ok(Some(song)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn genre_by_id(conn: &Connection, id: i64) -> StoreResult<Option<Genre>> {
    let mut stmt = conn.prepare_cached("SELECT id, description FROM genres WHERE id = ?1")?;
    match stmt.query_row(params![id], parse_genre_row) {
        Ok(genre) => Ok(Some(genre)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn songs_for_artist(conn: &Connection, artist_id: i64) -> StoreResult<Vec<Song>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title, album, length, artist_id FROM songs WHERE artist_id = ?1 ORDER BY id",
    )?;
    let songs = stmt
        .query_map(params![artist_id], parse_song_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(songs)
}

fn genre_edges_for_song(conn: &Connection, song_id: i64) -> StoreResult<Vec<GenreMembership>> {
    let mut stmt = conn.prepare_cached(
        "SELECT genre_id FROM song_genres WHERE song_id = ?1 ORDER BY genre_id",
    )?;
    let edges = stmt
        .query_map(params![song_id], |r| {
            Ok(GenreMembership { genre_id: r.get(0)? })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(edges)
}

fn song_edges_for_genre(conn: &Connection, genre_id: i64) -> StoreResult<Vec<SongMembership>> {
    let mut stmt = conn
        .prepare_cached("SELECT song_id FROM song_genres WHERE genre_id = ?1 ORDER BY song_id")?;
    let edges = stmt
        .query_map(params![genre_id], |r| Ok(SongMembership { song_id: r.get(0)? }))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(edges)
}

fn resolve_song(conn: &Connection, song: Song) -> StoreResult<ResolvedSong> {
    let artist =
        artist_by_id(conn, song.artist_id)?.ok_or(StoreError::MissingReference {
            entity: "artist",
            id: song.artist_id,
        })?;
    let genres = genre_edges_for_song(conn, song.id)?;
    Ok(ResolvedSong {
        id: song.id,
        title: song.title,
        artist,
        album: song.album,
        length: song.length,
        genres,
    })
}

/// Replace a song's membership edges inside an open transaction.
///
/// Every referenced genre is resolved first so a dangling id aborts before
/// anything is touched. Duplicate ids in the input collapse to one edge.
fn replace_song_genres(tx: &Transaction, song_id: i64, genre_ids: &[i64]) -> StoreResult<()> {
    for &genre_id in genre_ids {
        if genre_by_id(tx, genre_id)?.is_none() {
            return Err(StoreError::MissingReference {
                entity: "genre",
                id: genre_id,
            });
        }
    }
    tx.execute(
        "DELETE FROM song_genres WHERE song_id = ?1",
        params![song_id],
    )?;
    let mut stmt =
        tx.prepare_cached("INSERT OR IGNORE INTO song_genres (song_id, genre_id) VALUES (?1, ?2)")?;
    for &genre_id in genre_ids {
        stmt.execute(params![song_id, genre_id])?;
    }
    Ok(())
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl ArtistStore for SqliteCatalogStore {
    fn list_artists(&self) -> StoreResult<Vec<ArtistWithSongs>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached("SELECT id, name, age, bio FROM artists ORDER BY id")?;
        let artists = stmt
            .query_map([], parse_artist_row)?
            .collect::<Result<Vec<_>, _>>()?;

        artists
            .into_iter()
            .map(|artist| {
                let songs = songs_for_artist(&conn, artist.id)?;
                Ok(ArtistWithSongs {
                    id: artist.id,
                    name: artist.name,
                    age: artist.age,
                    bio: artist.bio,
                    songs,
                })
            })
            .collect()
    }

    fn get_artist(&self, id: i64) -> StoreResult<Option<ResolvedArtist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let artist = match artist_by_id(&conn, id)? {
            Some(artist) => artist,
            None => return Ok(None),
        };
        let songs = songs_for_artist(&conn, id)?;

        Ok(Some(ResolvedArtist {
            id: artist.id,
            name: artist.name,
            age: artist.age,
            bio: artist.bio,
            song_count: songs.len() as i64,
            songs,
        }))
    }

    fn create_artist(&self, fields: &ArtistFields) -> StoreResult<ArtistWithSongs> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO artists (name, age, bio) VALUES (?1, ?2, ?3)",
            params![fields.name, fields.age, fields.bio],
        )?;
        Ok(ArtistWithSongs {
            id: conn.last_insert_rowid(),
            name: fields.name.clone(),
            age: fields.age,
            bio: fields.bio.clone(),
            songs: Vec::new(),
        })
    }

    fn update_artist(&self, id: i64, fields: &ArtistFields) -> StoreResult<ArtistWithSongs> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        if artist_by_id(&tx, id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "artist",
                id,
            });
        }
        tx.execute(
            "UPDATE artists SET name = ?1, age = ?2, bio = ?3 WHERE id = ?4",
            params![fields.name, fields.age, fields.bio, id],
        )?;
        let songs = songs_for_artist(&tx, id)?;
        tx.commit()?;

        Ok(ArtistWithSongs {
            id,
            name: fields.name.clone(),
            age: fields.age,
            bio: fields.bio.clone(),
            songs,
        })
    }

    fn delete_artist(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        if artist_by_id(&tx, id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "artist",
                id,
            });
        }
        let dependents: i64 = tx.query_row(
            "SELECT COUNT(*) FROM songs WHERE artist_id = ?1",
            params![id],
            |r| r.get(0),
        )?;
        if dependents > 0 {
            return Err(StoreError::HasDependents {
                entity: "artist",
                id,
                count: dependents,
                dependents: "songs",
            });
        }
        tx.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn artists_count(&self) -> usize {
        self.count_table("artists")
    }
}

impl SongStore for SqliteCatalogStore {
    fn list_songs(&self) -> StoreResult<Vec<ResolvedSong>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn
            .prepare_cached("SELECT id, title, album, length, artist_id FROM songs ORDER BY id")?;
        let songs = stmt
            .query_map([], parse_song_row)?
            .collect::<Result<Vec<_>, _>>()?;

        songs
            .into_iter()
            .map(|song| resolve_song(&conn, song))
            .collect()
    }

    fn get_song(&self, id: i64) -> StoreResult<Option<ResolvedSong>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        match song_by_id(&conn, id)? {
            Some(song) => Ok(Some(resolve_song(&conn, song)?)),
            None => Ok(None),
        }
    }

    fn create_song(&self, fields: &SongFields) -> StoreResult<ResolvedSong> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        let artist =
            artist_by_id(&tx, fields.artist_id)?.ok_or(StoreError::MissingReference {
                entity: "artist",
                id: fields.artist_id,
            })?;

        tx.execute(
            "INSERT INTO songs (title, album, length, artist_id) VALUES (?1, ?2, ?3, ?4)",
            params![fields.title, fields.album, fields.length, fields.artist_id],
        )?;
        let id = tx.last_insert_rowid();

        if let Some(genre_ids) = &fields.genre_ids {
            replace_song_genres(&tx, id, genre_ids)?;
        }
        let genres = genre_edges_for_song(&tx, id)?;
        tx.commit()?;

        Ok(ResolvedSong {
            id,
            title: fields.title.clone(),
            artist,
            album: fields.album.clone(),
            length: fields.length,
            genres,
        })
    }

    fn update_song(&self, id: i64, fields: &SongFields) -> StoreResult<ResolvedSong> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        if song_by_id(&tx, id)?.is_none() {
            return Err(StoreError::NotFound { entity: "song", id });
        }
        let artist =
            artist_by_id(&tx, fields.artist_id)?.ok_or(StoreError::MissingReference {
                entity: "artist",
                id: fields.artist_id,
            })?;

        tx.execute(
            "UPDATE songs SET title = ?1, album = ?2, length = ?3, artist_id = ?4 WHERE id = ?5",
            params![fields.title, fields.album, fields.length, fields.artist_id, id],
        )?;
        if let Some(genre_ids) = &fields.genre_ids {
            replace_song_genres(&tx, id, genre_ids)?;
        }
        let genres = genre_edges_for_song(&tx, id)?;
        tx.commit()?;

        Ok(ResolvedSong {
            id,
            title: fields.title.clone(),
            artist,
            album: fields.album.clone(),
            length: fields.length,
            genres,
        })
    }

    fn delete_song(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        if song_by_id(&tx, id)?.is_none() {
            return Err(StoreError::NotFound { entity: "song", id });
        }
        // Membership edges cascade with the song row.
        tx.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn songs_count(&self) -> usize {
        self.count_table("songs")
    }
}

impl GenreStore for SqliteCatalogStore {
    fn list_genres(&self) -> StoreResult<Vec<ResolvedGenre>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached("SELECT id, description FROM genres ORDER BY id")?;
        let genres = stmt
            .query_map([], parse_genre_row)?
            .collect::<Result<Vec<_>, _>>()?;

        genres
            .into_iter()
            .map(|genre| {
                let songs = song_edges_for_genre(&conn, genre.id)?;
                Ok(ResolvedGenre {
                    id: genre.id,
                    description: genre.description,
                    songs,
                })
            })
            .collect()
    }

    fn get_genre(&self, id: i64) -> StoreResult<Option<ResolvedGenre>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let genre = match genre_by_id(&conn, id)? {
            Some(genre) => genre,
            None => return Ok(None),
        };
        let songs = song_edges_for_genre(&conn, id)?;

        Ok(Some(ResolvedGenre {
            id: genre.id,
            description: genre.description,
            songs,
        }))
    }

    fn create_genre(&self, fields: &GenreFields) -> StoreResult<ResolvedGenre> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO genres (description) VALUES (?1)",
            params![fields.description],
        )?;
        Ok(ResolvedGenre {
            id: conn.last_insert_rowid(),
            description: fields.description.clone(),
            songs: Vec::new(),
        })
    }

    fn update_genre(&self, id: i64, fields: &GenreFields) -> StoreResult<ResolvedGenre> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        if genre_by_id(&tx, id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "genre",
                id,
            });
        }
        tx.execute(
            "UPDATE genres SET description = ?1 WHERE id = ?2",
            params![fields.description, id],
        )?;
        let songs = song_edges_for_genre(&tx, id)?;
        tx.commit()?;

        Ok(ResolvedGenre {
            id,
            description: fields.description.clone(),
            songs,
        })
    }

    fn delete_genre(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        if genre_by_id(&tx, id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "genre",
                id,
            });
        }
        // Membership edges cascade with the genre row.
        tx.execute("DELETE FROM genres WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn genres_count(&self) -> usize {
        self.count_table("genres")
    }
}

impl JoinStore for SqliteCatalogStore {
    fn set_song_genres(&self, song_id: i64, genre_ids: &[i64]) -> StoreResult<()> {
        let mut conn = self.write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        if song_by_id(&tx, song_id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "song",
                id: song_id,
            });
        }
        replace_song_genres(&tx, song_id, genre_ids)?;
        tx.commit()?;
        Ok(())
    }

    fn get_song_genres(&self, song_id: i64) -> StoreResult<Vec<GenreMembership>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        genre_edges_for_song(&conn, song_id)
    }

    fn get_genre_songs(&self, genre_id: i64) -> StoreResult<Vec<SongMembership>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        song_edges_for_genre(&conn, genre_id)
    }
}
