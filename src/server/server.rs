use anyhow::Result;
use std::time::{Duration, Instant};

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tracing::info;

use super::artist_routes::artist_routes;
use super::genre_routes::genre_routes;
use super::song_routes::song_routes;
use super::state::{GuardedCatalogStore, ServerState};
#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{log_requests, RequestsLoggingLevel, ServerConfig};
use crate::catalog_store::{ArtistStore, GenreStore, SongStore};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub artists: usize,
    pub songs: usize,
    pub genres: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        artists: state.catalog_store.artists_count(),
        songs: state.catalog_store.songs_count(),
        genres: state.catalog_store.genres_count(),
    };
    Json(stats)
}

impl ServerState {
    fn new(config: ServerConfig, catalog_store: GuardedCatalogStore) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app(config: ServerConfig, catalog_store: GuardedCatalogStore) -> Router {
    let state = ServerState::new(config, catalog_store);

    #[allow(unused_mut)]
    let mut app: Router<ServerState> = Router::new()
        .route("/", get(home))
        .merge(artist_routes())
        .merge(song_routes())
        .merge(genre_routes());

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }

    app.layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    catalog_store: GuardedCatalogStore,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, catalog_store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::SqliteCatalogStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt; // for `oneshot`

    fn test_app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let store =
            Arc::new(SqliteCatalogStore::new(dir.path().join("catalog.db"), 1).unwrap());
        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port: 0,
        };
        (dir, make_app(config, store))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_catalog_lists_respond_ok() {
        let (_dir, app) = test_app();

        for route in ["/artists", "/songs", "/genres"] {
            let request = Request::builder().uri(route).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await, serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn missing_records_respond_not_found() {
        let (_dir, app) = test_app();

        // Genres included: a missing genre is a plain 404 like the others.
        for route in ["/artists/1", "/songs/1", "/genres/1"] {
            let request = Request::builder().uri(route).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);

            let json = body_json(response).await;
            assert!(!json["message"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn create_with_missing_fields_responds_bad_request() {
        let (_dir, app) = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/artists")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "The Test Band"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["missing_fields"], serde_json::json!(["age", "bio"]));
    }

    #[tokio::test]
    async fn home_reports_catalog_counts() {
        let (_dir, app) = test_app();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["artists"], 0);
        assert_eq!(json["songs"], 0);
        assert_eq!(json["genres"], 0);
    }
}
