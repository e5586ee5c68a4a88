//! Song CRUD routes.
//!
//! Songs are the only write path for genre memberships: the optional
//! `genre_ids` array replaces the song's membership set when present.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use super::state::{GuardedCatalogStore, ServerState};
use crate::catalog_store::{SongFields, SongStore};

/// Request body for song create/update. `genre_ids` is genuinely optional;
/// the other fields are required and validated explicitly.
#[derive(Debug, Deserialize)]
pub struct SongBody {
    pub title: Option<String>,
    pub artist_id: Option<i64>,
    pub album: Option<String>,
    pub length: Option<i64>,
    #[serde(default)]
    pub genre_ids: Option<Vec<i64>>,
}

impl SongBody {
    fn into_fields(self) -> Result<SongFields, ApiError> {
        match (self.title, self.artist_id, self.album, self.length) {
            (Some(title), Some(artist_id), Some(album), Some(length)) => Ok(SongFields {
                title,
                album,
                length,
                artist_id,
                genre_ids: self.genre_ids,
            }),
            (title, artist_id, album, length) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push("title");
                }
                if artist_id.is_none() {
                    missing.push("artist_id");
                }
                if album.is_none() {
                    missing.push("album");
                }
                if length.is_none() {
                    missing.push("length");
                }
                Err(ApiError::MissingFields(missing))
            }
        }
    }
}

async fn list_songs(State(store): State<GuardedCatalogStore>) -> Result<Response, ApiError> {
    let songs = store.list_songs()?;
    Ok(Json(songs).into_response())
}

async fn retrieve_song(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match store.get_song(id)? {
        Some(song) => Ok(Json(song).into_response()),
        None => Err(ApiError::not_found("song", id)),
    }
}

async fn create_song(
    State(store): State<GuardedCatalogStore>,
    Json(body): Json<SongBody>,
) -> Result<Response, ApiError> {
    debug!("Creating song from {:?}", body);
    let song = store.create_song(&body.into_fields()?)?;
    Ok(Json(song).into_response())
}

async fn update_song(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
    Json(body): Json<SongBody>,
) -> Result<Response, ApiError> {
    let song = store.update_song(id, &body.into_fields()?)?;
    Ok(Json(song).into_response())
}

async fn destroy_song(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    store.delete_song(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub fn song_routes() -> Router<ServerState> {
    Router::new()
        .route("/songs", get(list_songs).post(create_song))
        .route(
            "/songs/{id}",
            get(retrieve_song).put(update_song).delete(destroy_song),
        )
}
