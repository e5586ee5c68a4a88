//! Genre CRUD routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::error::ApiError;
use super::state::{GuardedCatalogStore, ServerState};
use crate::catalog_store::{GenreFields, GenreStore};

#[derive(Debug, Deserialize)]
pub struct GenreBody {
    pub description: Option<String>,
}

impl GenreBody {
    fn into_fields(self) -> Result<GenreFields, ApiError> {
        match self.description {
            Some(description) => Ok(GenreFields { description }),
            None => Err(ApiError::MissingFields(vec!["description"])),
        }
    }
}

async fn list_genres(State(store): State<GuardedCatalogStore>) -> Result<Response, ApiError> {
    let genres = store.list_genres()?;
    Ok(Json(genres).into_response())
}

async fn retrieve_genre(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match store.get_genre(id)? {
        Some(genre) => Ok(Json(genre).into_response()),
        None => Err(ApiError::not_found("genre", id)),
    }
}

async fn create_genre(
    State(store): State<GuardedCatalogStore>,
    Json(body): Json<GenreBody>,
) -> Result<Response, ApiError> {
    let genre = store.create_genre(&body.into_fields()?)?;
    Ok(Json(genre).into_response())
}

async fn update_genre(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
    Json(body): Json<GenreBody>,
) -> Result<Response, ApiError> {
    let genre = store.update_genre(id, &body.into_fields()?)?;
    Ok(Json(genre).into_response())
}

async fn destroy_genre(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    store.delete_genre(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub fn genre_routes() -> Router<ServerState> {
    Router::new()
        .route("/genres", get(list_genres).post(create_genre))
        .route(
            "/genres/{id}",
            get(retrieve_genre).put(update_genre).delete(destroy_genre),
        )
}
