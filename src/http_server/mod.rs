//! # NoteDB HTTP Server Module
//!
//! HTTP surface over the note store. Handlers are thin: parse the
//! request, call one store operation, shape the response. No business
//! logic lives here.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Store metrics snapshot
//! - `/api/notes` - Note CRUD and paged listing
//! - everything else - Static frontend files

pub mod config;
pub mod errors;
pub mod note_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
