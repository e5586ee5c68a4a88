//! SQLite schema for the tuna catalog database.
//!
//! Integer primary keys are the public entity ids. Song→genre memberships
//! live in a join table with real FOREIGN KEY constraints: join rows cascade
//! away with their song or genre, while deleting an artist with dependent
//! songs is refused (restrict policy).

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Core Tables
// =============================================================================

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("age", &SqlType::Integer, non_null = true),
        sqlite_column!("bio", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const SONG_ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("album", &SqlType::Text, non_null = true),
        sqlite_column!("length", &SqlType::Integer, non_null = true), // seconds
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_ARTIST_FK)
        ),
    ],
    indices: &[("idx_songs_artist", "artist_id")],
    unique_constraints: &[],
};

const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

// =============================================================================
// Junction Table
// =============================================================================

const MEMBERSHIP_SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const MEMBERSHIP_GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genres",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// Song <-> Genre membership edges. The pair is unique: the same genre
/// cannot be attached to a song twice.
const SONG_GENRES_TABLE: Table = Table {
    name: "song_genres",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MEMBERSHIP_SONG_FK)
        ),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MEMBERSHIP_GENRE_FK)
        ),
    ],
    indices: &[
        ("idx_song_genres_song", "song_id"),
        ("idx_song_genres_genre", "genre_id"),
    ],
    unique_constraints: &[&["song_id", "genre_id"]],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ARTISTS_TABLE, SONGS_TABLE, GENRES_TABLE, SONG_GENRES_TABLE],
    migration: None,
}];
