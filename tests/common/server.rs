//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own catalog database.

use super::constants::*;
use super::fixtures::seed_catalog;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tuna_catalog_server::server::server::make_app;
use tuna_catalog_server::server::{RequestsLoggingLevel, ServerConfig};
use tuna_catalog_server::SqliteCatalogStore;

/// Test server instance with an isolated catalog database
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a test server over the seeded catalog (see fixtures.rs).
    pub async fn spawn() -> Self {
        Self::spawn_inner(true).await
    }

    /// Spawns a test server over an empty catalog.
    pub async fn spawn_empty() -> Self {
        Self::spawn_inner(false).await
    }

    /// This function:
    /// 1. Creates a temporary catalog database (optionally seeded)
    /// 2. Binds to a random port (127.0.0.1:0)
    /// 3. Spawns the server in a background task with graceful shutdown
    /// 4. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if catalog creation fails, port binding fails, or the server
    /// doesn't become ready within the timeout.
    async fn spawn_inner(seed: bool) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_db_dir.path().join("catalog.db");

        let catalog_store =
            Arc::new(SqliteCatalogStore::new(&db_path, 2).expect("Failed to open catalog store"));
        if seed {
            seed_catalog(&catalog_store).expect("Failed to seed catalog");
        }

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(config, catalog_store);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the stats endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal; TempDir cleans up after itself
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
