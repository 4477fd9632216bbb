//! Note Routes
//!
//! CRUD endpoints over the note store. Every handler is a thin
//! translation layer: parse the request, call one store operation,
//! map the result onto a status code and a JSON body.

use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::store::{Note, NoteStore};

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// State shared by all note handlers
pub struct NoteRoutesState {
    pub store: NoteStore,
    pub page_size: usize,
}

// ==================
// Request Types
// ==================

/// Body accepted by create and update. An `id` field in the body is
/// ignored; the path (or the allocator) decides the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Query parameters for the list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<String>,
}

// ==================
// Note Routes
// ==================

/// Create note routes
pub fn note_routes(state: Arc<NoteRoutesState>) -> Router {
    Router::new()
        .route("/notes", get(list_notes_handler))
        .route("/notes", post(create_note_handler))
        .route("/notes/{id}", get(get_note_handler))
        .route("/notes/{id}", put(update_note_handler))
        .route("/notes/{id}", delete(delete_note_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn parse_note_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

fn parse_page(query: &ListQuery) -> Result<usize, ApiError> {
    match &query.page {
        None => Ok(0),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiError::InvalidQueryParam(format!("page: {}", raw))),
    }
}

// ==================
// Note Handlers
// ==================

async fn list_notes_handler(
    State(state): State<Arc<NoteRoutesState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Note>>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQueryParam(e.body_text()))?;
    let page = parse_page(&query)?;

    let offset = page.saturating_mul(state.page_size);
    let notes = state.store.range(offset, state.page_size)?;
    Ok(Json(notes))
}

async fn create_note_handler(
    State(state): State<Arc<NoteRoutesState>>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let note = state.store.create(payload.title, payload.content)?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn get_note_handler(
    State(state): State<Arc<NoteRoutesState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let id = parse_note_id(&id)?;

    let note = state.store.get(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(note))
}

async fn update_note_handler(
    State(state): State<Arc<NoteRoutesState>>,
    Path(id): Path<String>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let id = parse_note_id(&id)?;
    let Json(payload) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    // Updating through the API never resurrects or invents ids
    if state.store.get(id)?.is_none() {
        return Err(ApiError::NotFound);
    }

    let note = state.store.edit(id, payload.title, payload.content)?;
    Ok(Json(note))
}

async fn delete_note_handler(
    State(state): State<Arc<NoteRoutesState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_note_id(&id)?;

    if !state.store.delete(id)? {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
