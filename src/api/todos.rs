// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! CRUD endpoints for todos.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::ApiState;
use crate::error::TidoError;
use crate::models::{Todo, TodoDraft};
use crate::store::RecordStore;

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// Fetch the full snapshot, bootstrapping default categories when the
/// category set is empty.
pub async fn get_todos(State(state): State<ApiState>) -> impl IntoResponse {
    let result = state
        .store
        .ensure_default_categories()
        .and_then(|_| state.store.list());

    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch todos");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch todos"})),
            )
                .into_response()
        }
    }
}

/// Create a todo from its fields (id and timestamps are store-assigned)
pub async fn create_todo(
    State(state): State<ApiState>,
    Json(draft): Json<TodoDraft>,
) -> impl IntoResponse {
    match state.store.create(draft) {
        Ok(todo) => (StatusCode::OK, Json(todo)).into_response(),
        Err(TidoError::InvalidInput(message)) => {
            (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to create todo");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to create todo"})),
            )
                .into_response()
        }
    }
}

/// Replace a todo's fields by id
pub async fn update_todo(
    State(state): State<ApiState>,
    Json(todo): Json<Todo>,
) -> impl IntoResponse {
    match state.store.update(todo) {
        Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Todo not found"})),
        )
            .into_response(),
        Err(TidoError::InvalidInput(message)) => {
            (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to update todo");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to update todo"})),
            )
                .into_response()
        }
    }
}

/// Delete a todo by `?id=...`
pub async fn delete_todo(
    State(state): State<ApiState>,
    Query(params): Query<DeleteParams>,
) -> impl IntoResponse {
    let Some(id) = params.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Todo ID is required"})),
        )
            .into_response();
    };

    match state.store.delete(&id) {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({"message": "Todo deleted successfully"})),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Todo not found"})),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to delete todo");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to delete todo"})),
            )
                .into_response()
        }
    }
}
