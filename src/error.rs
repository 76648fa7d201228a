// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Error types for Tido
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for Tido operations
#[derive(Error, Debug)]
pub enum TidoError {
    /// Upstream model API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Record store errors (persistence layer)
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input (e.g. an empty todo title)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The model produced a tool call we could not decode
    #[error("Unparseable tool call: {0}")]
    UnparseableToolCall(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// API-specific error types for the model-completion collaborator
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed (invalid API key)
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Rate limited by the API
    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    /// Requested model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Timeout waiting for response
    #[error("Request timed out")]
    Timeout,
}

/// Result type alias for Tido operations
pub type Result<T> = std::result::Result<T, TidoError>;

impl From<rusqlite::Error> for TidoError {
    fn from(err: rusqlite::Error) -> Self {
        TidoError::Store(err.to_string())
    }
}
