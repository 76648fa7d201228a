// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! HTTP API routes for Tido
//!
//! Thin marshalling layer over the store and the chat orchestrator. Error
//! detail never crosses this boundary: clients get a generic message and
//! the specifics go to the logs.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

pub mod chat;
pub mod todos;

use crate::chat::ChatOrchestrator;
use crate::store::RecordStore;

/// Chat backend: ready, or waiting on a credential
#[derive(Clone)]
pub enum ChatBackend {
    Ready(Arc<ChatOrchestrator>),
    /// No usable API key; the reason is the instructive message returned
    /// to clients
    Unconfigured { reason: String },
}

/// Shared state for all handlers
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn RecordStore>,
    pub chat: ChatBackend,
}

/// Configure all API routes
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat::chat))
        .route(
            "/todos",
            get(todos::get_todos)
                .post(todos::create_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
