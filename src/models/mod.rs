// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Core data model: todos, categories, and the snapshot returned to clients.
//!
//! Wire names are camelCase to match the JSON contract consumed by the UI
//! and echoed back to the model as tool output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single task record with scheduling and categorization metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Store-assigned opaque identifier
    pub id: String,
    /// Title, never empty
    pub title: String,
    /// Free-text description, may be empty
    #[serde(default)]
    pub description: String,
    /// Completion flag
    pub completed: bool,
    /// Priority level
    pub priority: Priority,
    /// Owning category id (slug)
    pub category: String,
    /// Due date, date-only
    pub due_date: NaiveDate,
    /// Store-assigned creation timestamp
    pub created_at: DateTime<Utc>,
    /// Store-assigned last-update timestamp, always >= created_at
    pub updated_at: DateTime<Utc>,
}

/// Priority of a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Stable lowercase form used in storage and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse the stored lowercase form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, colored grouping that todos reference by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable short identifier (slug)
    pub id: String,
    /// Display name
    pub name: String,
    /// Presentation color, opaque to the core
    pub color: String,
}

/// Todo fields minus the store-assigned id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    pub due_date: NaiveDate,
}

/// Full store snapshot returned by `GET /todos`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSnapshot {
    pub todos: Vec<Todo>,
    pub categories: Vec<Category>,
    pub metadata: SnapshotMetadata,
}

/// Snapshot bookkeeping for programmatic consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub last_updated: DateTime<Utc>,
    pub total_todos: usize,
    pub completed_todos: usize,
    pub version: String,
}

/// Schema version reported in snapshot metadata
pub const SNAPSHOT_VERSION: &str = "2.0.0";

/// One turn of chat history as submitted by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Who authored a chat history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}
