//! Artist CRUD routes.

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
use crate::catalog_store::{ArtistFields, ArtistStore};

/// Request body for artist create/update. Every field is required, but they
/// are modeled as options so a missing key becomes a structured 400 rather
/// than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ArtistBody {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub bio: Option<String>,
}

impl ArtistBody {
    fn into_fields(self) -> Result<ArtistFields, ApiError> {
        match (self.name, self.age, self.bio) {
            (Some(name), Some(age), Some(bio)) => Ok(ArtistFields { name, age, bio }),
            (name, age, bio) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("name");
                }
                if age.is_none() {
                    missing.push("age");
                }
                if bio.is_none() {
                    missing.push("bio");
                }
                Err(ApiError::MissingFields(missing))
            }
        }
    }
}

async fn list_artists(State(store): State<GuardedCatalogStore>) -> Result<Response, ApiError> {
    let artists = store.list_artists()?;
    Ok(Json(artists).into_response())
}

async fn retrieve_artist(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match store.get_artist(id)? {
        Some(artist) => Ok(Json(artist).into_response()),
        None => Err(ApiError::not_found("artist", id)),
    }
}

async fn create_artist(
    State(store): State<GuardedCatalogStore>,
    Json(body): Json<ArtistBody>,
) -> Result<Response, ApiError> {
    debug!("Creating artist from {:?}", body);
    let artist = store.create_artist(&body.into_fields()?)?;
    Ok(Json(artist).into_response())
}

async fn update_artist(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
    Json(body): Json<ArtistBody>,
) -> Result<Response, ApiError> {
    let artist = store.update_artist(id, &body.into_fields()?)?;
    Ok(Json(artist).into_response())
}

async fn destroy_artist(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    store.delete_artist(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub fn artist_routes() -> Router<ServerState> {
    Router::new()
        .route("/artists", get(list_artists).post(create_artist))
        .route(
            "/artists/{id}",
            get(retrieve_artist)
                .put(update_artist)
                .delete(destroy_artist),
        )
}
