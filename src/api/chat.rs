// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! The natural-language chat endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiState, ChatBackend};
use crate::error::TidoError;
use crate::models::ChatMessage;

/// Generic apology for faults whose detail must stay server-side
const GENERIC_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Run one chat turn: the model selects an action, the dispatcher executes
/// it, and the model summarizes the outcome.
pub async fn chat(
    State(state): State<ApiState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let orchestrator = match &state.chat {
        ChatBackend::Ready(orchestrator) => orchestrator.clone(),
        ChatBackend::Unconfigured { reason } => {
            return (StatusCode::BAD_REQUEST, Json(json!({"message": reason}))).into_response();
        }
    };

    match orchestrator
        .handle_turn(&request.message, &request.history)
        .await
    {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(TidoError::Config(reason)) => {
            (StatusCode::BAD_REQUEST, Json(json!({"message": reason}))).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": GENERIC_ERROR_REPLY})),
            )
                .into_response()
        }
    }
}
