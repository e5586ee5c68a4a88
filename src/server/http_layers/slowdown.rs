//! Slowdown middleware for local latency testing
#![allow(dead_code)] // Feature-gated middleware

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use std::time::Duration;

const SLOWDOWN_MS: u64 = 750;

/// Middleware that delays every request by a fixed amount of time.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(SLOWDOWN_MS)).await;
    next.run(request).await
}
