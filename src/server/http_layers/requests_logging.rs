//! Request logging middleware
#![allow(dead_code)] // Used as middleware

use axum::extract::State;
use axum::{
    body::Body,
    http::{header::HeaderMap, Request, Response},
    middleware::Next,
};
use std::time::Instant;
use tracing::{error, info};

use super::super::state::ServerState;

#[derive(PartialEq, PartialOrd, Clone, Debug, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    Path,
    Headers,
    Body,
}

impl Default for RequestsLoggingLevel {
    fn default() -> Self {
        Self::Path
    }
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

fn parse_content_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    let value = headers
        .get("content-length")
        .ok_or("Content-length not set.")?;
    let str_value = value
        .to_str()
        .map_err(|_| "Could not get Content-length string value.")?;
    str_value
        .parse::<usize>()
        .map_err(|_| "Could not parse Content-length numeric value.")
}

fn log_headers(label: &str, headers: &HeaderMap) {
    info!("  {} Headers:", label);
    for header in headers.iter() {
        info!("    {:?}: {:?}", header.0, header.1);
    }
}

/// Buffer a body of known size, log it, and hand back an equivalent body.
/// Fails with a ready-made 500 response if the body cannot be read.
async fn log_body(label: &str, size: usize, body: Body) -> Result<Body, Response<Body>> {
    let bytes = match axum::body::to_bytes(body, size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("Failed to read {} body: {:?}", label, err);
            let response = Response::builder()
                .status(500)
                .body(Body::from("Internal Server Error"))
                .unwrap();
            return Err(response);
        }
    };
    info!("  {} Body:\n{}", label, String::from_utf8_lossy(&bytes));
    Ok(Body::from(bytes))
}

pub async fn log_requests(
    State(state): State<ServerState>,
    mut request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let level = state.config.requests_logging_level.clone();
    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, uri);
    }
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", request.headers());
    }
    if level >= RequestsLoggingLevel::Body {
        match parse_content_length(request.headers()) {
            Err(reason) => info!("  Req Body: {}", reason),
            Ok(size) if size >= MAX_LOGGABLE_BODY_LENGTH => {
                info!(
                    "  Req Body: Too big to log ({:#})",
                    byte_unit::Byte::from(size)
                );
            }
            Ok(size) => {
                let (parts, body) = request.into_parts();
                match log_body("Req", size, body).await {
                    Ok(body) => request = Request::from_parts(parts, body),
                    Err(response) => return response,
                }
            }
        }
    }

    let mut response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", response.headers());
    }
    if level >= RequestsLoggingLevel::Body {
        match parse_content_length(response.headers()) {
            Err(reason) => info!("  Resp Body: {}", reason),
            Ok(size) if size >= MAX_LOGGABLE_BODY_LENGTH => {
                info!(
                    "  Resp Body: Too big to log ({:#})",
                    byte_unit::Byte::from(size)
                );
            }
            Ok(size) => {
                let (parts, body) = response.into_parts();
                match log_body("Resp", size, body).await {
                    Ok(body) => response = Response::from_parts(parts, body),
                    Err(error_response) => return error_response,
                }
            }
        }
    }

    if level > RequestsLoggingLevel::None {
        info!(
            "<<< {} ({}ms)",
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
    }

    response
}
