// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! The structured outcome of one dispatcher invocation.
//!
//! This is the contract object between the dispatcher and the orchestrator;
//! it is serialized verbatim as tool output for the model and handed to
//! HTTP clients as `functionResult`.

use serde::{Deserialize, Serialize};

use crate::models::Todo;

/// Outcome of one dispatched action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action was carried out
    pub success: bool,

    /// Human-readable outcome description
    pub message: String,

    /// The affected record, when a single record was touched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo: Option<Todo>,

    /// Matched records for searches, or the full candidate set for an
    /// ambiguous fuzzy match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Todo>>,
}

impl ActionResult {
    /// Successful outcome with only a message
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            todo: None,
            todos: None,
        }
    }

    /// Successful outcome carrying the affected record
    pub fn with_todo(message: impl Into<String>, todo: Todo) -> Self {
        Self {
            success: true,
            message: message.into(),
            todo: Some(todo),
            todos: None,
        }
    }

    /// Successful outcome carrying matched records
    pub fn with_todos(message: impl Into<String>, todos: Vec<Todo>) -> Self {
        Self {
            success: true,
            message: message.into(),
            todo: None,
            todos: Some(todos),
        }
    }

    /// Failed outcome (not found, validation, store fault)
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            todo: None,
            todos: None,
        }
    }

    /// Ambiguous fuzzy match: the full candidate set plus a numbered,
    /// 1-based disambiguation message. Not a failure in the error sense,
    /// but `success` is false so no caller mistakes it for an applied
    /// action.
    pub fn ambiguous(query: &str, candidates: Vec<Todo>) -> Self {
        let listing = candidates
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {}", i + 1, t.title))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            success: false,
            message: format!(
                "Multiple todos found matching \"{}\". Please be more specific:\n{}",
                query, listing
            ),
            todo: None,
            todos: Some(candidates),
        }
    }

    /// Whether this is an ambiguous-match outcome awaiting clarification
    pub fn is_ambiguous(&self) -> bool {
        !self.success && self.todos.is_some()
    }
}
