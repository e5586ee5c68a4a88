//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalog-server endpoints.
//!
//! When API routes or request formats change, update only this file.
#![allow(dead_code)] // Not every test binary uses every endpoint helper

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("DELETE request failed")
    }

    // ========================================================================
    // Stats Endpoint
    // ========================================================================

    /// GET /
    pub async fn get_stats(&self) -> Response {
        self.get("/").await
    }

    // ========================================================================
    // Artist Endpoints
    // ========================================================================

    /// GET /artists
    pub async fn list_artists(&self) -> Response {
        self.get("/artists").await
    }

    /// GET /artists/{id}
    pub async fn get_artist(&self, id: i64) -> Response {
        self.get(&format!("/artists/{}", id)).await
    }

    /// POST /artists
    pub async fn create_artist(&self, body: &Value) -> Response {
        self.post("/artists", body).await
    }

    /// PUT /artists/{id}
    pub async fn update_artist(&self, id: i64, body: &Value) -> Response {
        self.put(&format!("/artists/{}", id), body).await
    }

    /// DELETE /artists/{id}
    pub async fn delete_artist(&self, id: i64) -> Response {
        self.delete(&format!("/artists/{}", id)).await
    }

    // ========================================================================
    // Song Endpoints
    // ========================================================================

    /// GET /songs
    pub async fn list_songs(&self) -> Response {
        self.get("/songs").await
    }

    /// GET /songs/{id}
    pub async fn get_song(&self, id: i64) -> Response {
        self.get(&format!("/songs/{}", id)).await
    }

    /// POST /songs
    pub async fn create_song(&self, body: &Value) -> Response {
        self.post("/songs", body).await
    }

    /// PUT /songs/{id}
    pub async fn update_song(&self, id: i64, body: &Value) -> Response {
        self.put(&format!("/songs/{}", id), body).await
    }

    /// DELETE /songs/{id}
    pub async fn delete_song(&self, id: i64) -> Response {
        self.delete(&format!("/songs/{}", id)).await
    }

    // ========================================================================
    // Genre Endpoints
    // ========================================================================

    /// GET /genres
    pub async fn list_genres(&self) -> Response {
        self.get("/genres").await
    }

    /// GET /genres/{id}
    pub async fn get_genre(&self, id: i64) -> Response {
        self.get(&format!("/genres/{}", id)).await
    }

    /// POST /genres
    pub async fn create_genre(&self, body: &Value) -> Response {
        self.post("/genres", body).await
    }

    /// PUT /genres/{id}
    pub async fn update_genre(&self, id: i64, body: &Value) -> Response {
        self.put(&format!("/genres/{}", id), body).await
    }

    /// DELETE /genres/{id}
    pub async fn delete_genre(&self, id: i64) -> Response {
        self.delete(&format!("/genres/{}", id)).await
    }
}
