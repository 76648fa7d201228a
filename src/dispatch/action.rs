// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! The closed catalog of actions the model may select.
//!
//! Tool-call payloads are decoded into one of these variants with typed
//! argument shapes; anything that does not decode is an unparseable tool
//! call, never a silent fallback.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, TidoError};
use crate::models::Priority;

/// One model-selected operation with validated arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    GetAllTodos,
    CreateTodo(CreateTodoArgs),
    UpdateTodo(UpdateTodoArgs),
    DeleteTodo { id: String },
    ToggleTodoCompletion { id: String },
    FindTodosByTitle { title: String },
    FindTodosByDescription { description: String },
    SmartSearchTodos { query: String },
    DeleteTodoByTitle { title: String },
    UpdateTodoByTitle(UpdateByTitleArgs),
    ToggleTodoByTitle { title: String },
}

/// Arguments for `create_todo`; omitted fields take configured defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoArgs {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Arguments for `update_todo`; omitted fields keep their current values
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoArgs {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Arguments for `update_todo_by_title`: a fuzzy search title plus the
/// replacement fields
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateByTitleArgs {
    /// Keywords or partial title locating the todo to update
    pub title: String,
    #[serde(default)]
    pub new_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
struct IdArg {
    id: String,
}

#[derive(Deserialize)]
struct TitleArg {
    title: String,
}

#[derive(Deserialize)]
struct DescriptionArg {
    description: String,
}

#[derive(Deserialize)]
struct QueryArg {
    query: String,
}

impl Action {
    /// Decode a tool call from the model into a typed action.
    ///
    /// Unknown function names and argument shapes that do not match the
    /// catalog schema are rejected as [`TidoError::UnparseableToolCall`].
    pub fn from_tool_call(name: &str, args: &Value) -> Result<Self> {
        let action = match name {
            "get_all_todos" => Action::GetAllTodos,
            "create_todo" => Action::CreateTodo(parse_args(name, args)?),
            "update_todo" => Action::UpdateTodo(parse_args(name, args)?),
            "delete_todo" => {
                let IdArg { id } = parse_args(name, args)?;
                Action::DeleteTodo { id }
            }
            "toggle_todo_completion" => {
                let IdArg { id } = parse_args(name, args)?;
                Action::ToggleTodoCompletion { id }
            }
            "find_todos_by_title" => {
                let TitleArg { title } = parse_args(name, args)?;
                Action::FindTodosByTitle { title }
            }
            "find_todos_by_description" => {
                let DescriptionArg { description } = parse_args(name, args)?;
                Action::FindTodosByDescription { description }
            }
            "smart_search_todos" => {
                let QueryArg { query } = parse_args(name, args)?;
                Action::SmartSearchTodos { query }
            }
            "delete_todo_by_title" => {
                let TitleArg { title } = parse_args(name, args)?;
                Action::DeleteTodoByTitle { title }
            }
            "update_todo_by_title" => Action::UpdateTodoByTitle(parse_args(name, args)?),
            "toggle_todo_by_title" => {
                let TitleArg { title } = parse_args(name, args)?;
                Action::ToggleTodoByTitle { title }
            }
            _ => {
                return Err(TidoError::UnparseableToolCall(format!(
                    "unknown function: {}",
                    name
                )))
            }
        };
        Ok(action)
    }

    /// Catalog name of this action
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetAllTodos => "get_all_todos",
            Action::CreateTodo(_) => "create_todo",
            Action::UpdateTodo(_) => "update_todo",
            Action::DeleteTodo { .. } => "delete_todo",
            Action::ToggleTodoCompletion { .. } => "toggle_todo_completion",
            Action::FindTodosByTitle { .. } => "find_todos_by_title",
            Action::FindTodosByDescription { .. } => "find_todos_by_description",
            Action::SmartSearchTodos { .. } => "smart_search_todos",
            Action::DeleteTodoByTitle { .. } => "delete_todo_by_title",
            Action::UpdateTodoByTitle(_) => "update_todo_by_title",
            Action::ToggleTodoByTitle { .. } => "toggle_todo_by_title",
        }
    }

    /// Whether this action can write to the store.
    ///
    /// Search-only actions are never mutations, no matter how the model
    /// used them; only these seven kinds may signal a list refresh.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Action::CreateTodo(_)
                | Action::UpdateTodo(_)
                | Action::DeleteTodo { .. }
                | Action::ToggleTodoCompletion { .. }
                | Action::DeleteTodoByTitle { .. }
                | Action::UpdateTodoByTitle(_)
                | Action::ToggleTodoByTitle { .. }
        )
    }
}

fn parse_args<T: DeserializeOwned>(name: &str, args: &Value) -> Result<T> {
    serde_json::from_value(args.clone()).map_err(|e| {
        TidoError::UnparseableToolCall(format!("bad arguments for {}: {}", name, e))
    })
}
