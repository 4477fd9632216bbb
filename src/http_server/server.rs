//! # HTTP Server
//!
//! Main HTTP server combining the note API, the observability
//! endpoints, and the static frontend.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::observability::{Event, Logger};
use crate::store::NoteStore;

use super::config::HttpServerConfig;
use super::note_routes::{note_routes, NoteRoutesState};
use super::observability_routes::observability_routes;

/// HTTP server for the note service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over a store
    pub fn new(config: HttpServerConfig, store: NoteStore) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, store: NoteStore) -> Router {
        let metrics = store.metrics();
        let note_state = Arc::new(NoteRoutesState {
            store,
            page_size: config.page_size,
        });

        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            // If no origins configured, use permissive for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            // Use configured origins for production
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        // Combine all routes
        Router::new()
            // Health and metrics at root level
            .merge(observability_routes(metrics))
            // Note CRUD under /api
            .nest("/api", note_routes(note_state))
            // Anything else falls through to the static frontend
            .fallback_service(ServeDir::new(&config.static_dir))
            // Apply CORS middleware
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server. Returns once a shutdown signal arrives
    /// and in-flight requests have drained.
    ///
    /// The configured host may be an IP address or a resolvable name.
    /// An address that fails to resolve or bind is returned as an
    /// error, never a panic.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?;
        Logger::info(Event::Serving, &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
