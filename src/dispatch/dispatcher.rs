// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Applies typed actions to the record store.
//!
//! Fuzzy-title actions run as an explicit two-step pipeline: resolve the
//! query to a [`Resolution`], branch on cardinality, and only then mutate.
//! With zero or multiple candidates the store is never written.
//!
//! `execute` is total: not-found, validation, and store faults all fold
//! into an [`ActionResult`] at this boundary instead of propagating.

use std::sync::Arc;

use crate::config::TodoDefaults;
use crate::error::Result;
use crate::models::{Todo, TodoDraft};
use crate::search::{self, Resolution};
use crate::store::RecordStore;

use super::action::{Action, CreateTodoArgs, UpdateByTitleArgs, UpdateTodoArgs};
use super::result::ActionResult;

/// Mutation applied to a fuzzily-resolved record
#[derive(Debug, Clone, PartialEq)]
pub enum TitleAction {
    Update(UpdateByTitleArgs),
    Delete,
    Toggle,
}

/// Executes cataloged actions against the record store
#[derive(Clone)]
pub struct ActionDispatcher {
    store: Arc<dyn RecordStore>,
    defaults: TodoDefaults,
}

impl ActionDispatcher {
    /// Create a dispatcher over a store with the configured field defaults
    pub fn new(store: Arc<dyn RecordStore>, defaults: TodoDefaults) -> Self {
        Self { store, defaults }
    }

    /// Execute one action and report its outcome.
    ///
    /// Never returns an error: store faults are logged and converted into
    /// failure results so nothing propagates past this boundary.
    pub fn execute(&self, action: &Action) -> ActionResult {
        match self.try_execute(action) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(function = action.name(), error = %err, "action failed");
                ActionResult::failure(format!("Error executing {}: {}", action.name(), err))
            }
        }
    }

    fn try_execute(&self, action: &Action) -> Result<ActionResult> {
        match action {
            Action::GetAllTodos => {
                let todos = self.store.todos()?;
                let message = format!("Found {} todos", todos.len());
                Ok(ActionResult::with_todos(message, todos))
            }
            Action::CreateTodo(args) => {
                let todo = self.create_by_fields(args)?;
                let message = format!("Successfully created todo: \"{}\"", todo.title);
                Ok(ActionResult::with_todo(message, todo))
            }
            Action::UpdateTodo(args) => self.update_by_id(args),
            Action::DeleteTodo { id } => self.delete_by_id(id),
            Action::ToggleTodoCompletion { id } => self.toggle_by_id(id),
            Action::FindTodosByTitle { title } => {
                let todos = self.store.search_title(title)?;
                let message =
                    format!("Found {} todos matching title: \"{}\"", todos.len(), title);
                Ok(ActionResult::with_todos(message, todos))
            }
            Action::FindTodosByDescription { description } => {
                let todos = self.store.search_description(description)?;
                let message = format!(
                    "Found {} todos matching description: \"{}\"",
                    todos.len(),
                    description
                );
                Ok(ActionResult::with_todos(message, todos))
            }
            Action::SmartSearchTodos { query } => {
                let todos = self.store.search_smart(query)?;
                let message = format!("Found {} todos matching: \"{}\"", todos.len(), query);
                Ok(ActionResult::with_todos(message, todos))
            }
            Action::DeleteTodoByTitle { title } => {
                self.resolve_and_act(title, &TitleAction::Delete)
            }
            Action::UpdateTodoByTitle(args) => {
                self.resolve_and_act(&args.title, &TitleAction::Update(args.clone()))
            }
            Action::ToggleTodoByTitle { title } => {
                self.resolve_and_act(title, &TitleAction::Toggle)
            }
        }
    }

    /// Create a todo, filling omitted fields from the configured defaults:
    /// description `"Task: {title}"`, medium priority, the default
    /// category, today's due date, not completed.
    pub fn create_by_fields(&self, args: &CreateTodoArgs) -> Result<Todo> {
        let draft = TodoDraft {
            title: args.title.clone(),
            description: args
                .description
                .clone()
                .unwrap_or_else(|| self.defaults.description_for(&args.title)),
            completed: args.completed.unwrap_or(false),
            priority: args.priority.unwrap_or(self.defaults.priority),
            category: args
                .category
                .clone()
                .unwrap_or_else(|| self.defaults.category.clone()),
            due_date: args.due_date.unwrap_or_else(|| self.defaults.due_date()),
        };
        self.store.create(draft)
    }

    fn update_by_id(&self, args: &UpdateTodoArgs) -> Result<ActionResult> {
        let Some(existing) = self.store.get(&args.id)? else {
            return Ok(not_found_by_id(&args.id));
        };

        // Omitted fields keep the record's current values; nothing is
        // nulled out by omission.
        let merged = Todo {
            title: args.title.clone().unwrap_or(existing.title),
            description: args.description.clone().unwrap_or(existing.description),
            completed: args.completed.unwrap_or(existing.completed),
            priority: args.priority.unwrap_or(existing.priority),
            category: args.category.clone().unwrap_or(existing.category),
            due_date: args.due_date.unwrap_or(existing.due_date),
            id: existing.id,
            created_at: existing.created_at,
            updated_at: existing.updated_at,
        };

        match self.store.update(merged)? {
            Some(updated) => {
                let message = format!("Successfully updated todo: \"{}\"", updated.title);
                Ok(ActionResult::with_todo(message, updated))
            }
            None => Ok(not_found_by_id(&args.id)),
        }
    }

    fn delete_by_id(&self, id: &str) -> Result<ActionResult> {
        if self.store.delete(id)? {
            Ok(ActionResult::success(format!(
                "Successfully deleted todo with ID: {}",
                id
            )))
        } else {
            Ok(not_found_by_id(id))
        }
    }

    fn toggle_by_id(&self, id: &str) -> Result<ActionResult> {
        let Some(existing) = self.store.get(id)? else {
            return Ok(not_found_by_id(id));
        };
        self.toggle(existing)
    }

    /// Resolve a fuzzy title and apply the action only when exactly one
    /// record matches. Zero matches report not-found; multiple matches
    /// report the candidate set for clarification. Either way the store
    /// stays untouched.
    pub fn resolve_and_act(&self, fuzzy_title: &str, action: &TitleAction) -> Result<ActionResult> {
        let todos = self.store.todos()?;
        let categories = self.store.categories()?;

        match search::resolve(fuzzy_title, &todos, &categories) {
            Resolution::NotFound => Ok(ActionResult::failure(format!(
                "No todos found matching: \"{}\"",
                fuzzy_title
            ))),
            Resolution::Ambiguous(candidates) => {
                tracing::debug!(
                    query = fuzzy_title,
                    candidates = candidates.len(),
                    "ambiguous fuzzy match, asking for clarification"
                );
                Ok(ActionResult::ambiguous(fuzzy_title, candidates))
            }
            Resolution::Resolved(target) => match action {
                TitleAction::Delete => {
                    self.store.delete(&target.id)?;
                    Ok(ActionResult::success(format!(
                        "Successfully deleted todo: \"{}\"",
                        target.title
                    )))
                }
                TitleAction::Toggle => self.toggle(target),
                TitleAction::Update(args) => self.update_resolved(target, args),
            },
        }
    }

    fn toggle(&self, todo: Todo) -> Result<ActionResult> {
        let id = todo.id.clone();
        let flipped = Todo {
            completed: !todo.completed,
            ..todo
        };

        match self.store.update(flipped)? {
            Some(updated) => {
                let verb = if updated.completed {
                    "completed"
                } else {
                    "uncompleted"
                };
                let message = format!("Successfully {} todo: \"{}\"", verb, updated.title);
                Ok(ActionResult::with_todo(message, updated))
            }
            None => Ok(not_found_by_id(&id)),
        }
    }

    fn update_resolved(&self, target: Todo, args: &UpdateByTitleArgs) -> Result<ActionResult> {
        // A new title with no explicit description regenerates the
        // description from the same template create uses, instead of
        // leaving the old text stale.
        let description = match (&args.new_title, &args.description) {
            (_, Some(description)) => description.clone(),
            (Some(new_title), None) => self.defaults.description_for(new_title),
            (None, None) => target.description.clone(),
        };

        let merged = Todo {
            title: args.new_title.clone().unwrap_or(target.title),
            description,
            completed: args.completed.unwrap_or(target.completed),
            priority: args.priority.unwrap_or(target.priority),
            category: args.category.clone().unwrap_or(target.category),
            due_date: args.due_date.unwrap_or(target.due_date),
            id: target.id.clone(),
            created_at: target.created_at,
            updated_at: target.updated_at,
        };

        match self.store.update(merged)? {
            Some(updated) => {
                let message = format!("Successfully updated todo: \"{}\"", updated.title);
                Ok(ActionResult::with_todo(message, updated))
            }
            None => Ok(not_found_by_id(&target.id)),
        }
    }
}

fn not_found_by_id(id: &str) -> ActionResult {
    ActionResult::failure(format!("Todo with ID {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::store::SqliteStore;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;

    fn dispatcher() -> ActionDispatcher {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_default_categories().unwrap();
        ActionDispatcher::new(Arc::new(store), TodoDefaults::default())
    }

    fn create(dispatcher: &ActionDispatcher, title: &str) -> Todo {
        dispatcher
            .create_by_fields(&CreateTodoArgs {
                title: title.to_string(),
                description: None,
                priority: None,
                category: None,
                due_date: None,
                completed: None,
            })
            .unwrap()
    }

    // ===== Create Tests =====

    #[test]
    fn test_create_applies_defaults() {
        let dispatcher = dispatcher();
        let todo = create(&dispatcher, "Buy milk");

        assert_eq!(todo.description, "Task: Buy milk");
        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.category, "personal");
        assert_eq!(todo.due_date, Utc::now().date_naive());
        assert!(!todo.completed);
    }

    #[test]
    fn test_create_keeps_explicit_fields() {
        let dispatcher = dispatcher();
        let todo = dispatcher
            .create_by_fields(&CreateTodoArgs {
                title: "Gym".to_string(),
                description: Some("Leg day".to_string()),
                priority: Some(Priority::High),
                category: Some("health".to_string()),
                due_date: Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
                completed: Some(true),
            })
            .unwrap();

        assert_eq!(todo.description, "Leg day");
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.category, "health");
        assert!(todo.completed);
    }

    #[test]
    fn test_execute_create_reports_success_message() {
        let dispatcher = dispatcher();
        let action = Action::from_tool_call("create_todo", &json!({"title": "Buy milk"})).unwrap();
        let result = dispatcher.execute(&action);

        assert!(result.success);
        assert_eq!(result.message, "Successfully created todo: \"Buy milk\"");
        assert!(result.todo.is_some());
    }

    #[test]
    fn test_execute_create_empty_title_fails_without_panic() {
        let dispatcher = dispatcher();
        let action = Action::from_tool_call("create_todo", &json!({"title": "  "})).unwrap();
        let result = dispatcher.execute(&action);

        assert!(!result.success);
        assert!(result.message.contains("create_todo"));
    }

    #[test]
    fn test_execute_create_unknown_category_folds_store_error() {
        let dispatcher = dispatcher();
        let action = Action::from_tool_call(
            "create_todo",
            &json!({"title": "x", "category": "no-such"}),
        )
        .unwrap();
        let result = dispatcher.execute(&action);

        assert!(!result.success);
        assert!(result.message.contains("Error executing create_todo"));
    }

    // ===== By-id Tests =====

    #[test]
    fn test_update_by_id_merges_partial_fields() {
        let dispatcher = dispatcher();
        let todo = create(&dispatcher, "Buy milk");

        let action = Action::from_tool_call(
            "update_todo",
            &json!({"id": todo.id, "priority": "high"}),
        )
        .unwrap();
        let result = dispatcher.execute(&action);

        assert!(result.success);
        let updated = result.todo.unwrap();
        assert_eq!(updated.priority, Priority::High);
        // Unspecified fields keep their values.
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.description, "Task: Buy milk");
    }

    #[test]
    fn test_update_by_id_not_found() {
        let dispatcher = dispatcher();
        let action =
            Action::from_tool_call("update_todo", &json!({"id": "ghost", "title": "x"})).unwrap();
        let result = dispatcher.execute(&action);

        assert!(!result.success);
        assert_eq!(result.message, "Todo with ID ghost not found");
    }

    #[test]
    fn test_delete_by_id() {
        let dispatcher = dispatcher();
        let todo = create(&dispatcher, "Buy milk");

        let action = Action::from_tool_call("delete_todo", &json!({"id": todo.id})).unwrap();
        let result = dispatcher.execute(&action);

        assert!(result.success);
        assert_eq!(
            result.message,
            format!("Successfully deleted todo with ID: {}", todo.id)
        );
    }

    #[test]
    fn test_delete_by_id_not_found() {
        let dispatcher = dispatcher();
        let action = Action::from_tool_call("delete_todo", &json!({"id": "ghost"})).unwrap();
        let result = dispatcher.execute(&action);
        assert!(!result.success);
    }

    #[test]
    fn test_toggle_twice_restores_state_with_increasing_stamps() {
        let dispatcher = dispatcher();
        let todo = create(&dispatcher, "Buy milk");

        let action =
            Action::from_tool_call("toggle_todo_completion", &json!({"id": todo.id})).unwrap();

        let first = dispatcher.execute(&action).todo.unwrap();
        assert!(first.completed);
        assert!(first.updated_at > todo.updated_at);

        let second = dispatcher.execute(&action).todo.unwrap();
        assert!(!second.completed);
        assert!(second.updated_at > first.updated_at);
    }

    #[test]
    fn test_toggle_messages_track_direction() {
        let dispatcher = dispatcher();
        let todo = create(&dispatcher, "Buy milk");
        let action =
            Action::from_tool_call("toggle_todo_completion", &json!({"id": todo.id})).unwrap();

        let done = dispatcher.execute(&action);
        assert_eq!(done.message, "Successfully completed todo: \"Buy milk\"");

        let undone = dispatcher.execute(&action);
        assert_eq!(
            undone.message,
            "Successfully uncompleted todo: \"Buy milk\""
        );
    }

    // ===== Search Tests =====

    #[test]
    fn test_get_all_todos_counts() {
        let dispatcher = dispatcher();
        create(&dispatcher, "One");
        create(&dispatcher, "Two");

        let result = dispatcher.execute(&Action::GetAllTodos);
        assert!(result.success);
        assert_eq!(result.message, "Found 2 todos");
        assert_eq!(result.todos.unwrap().len(), 2);
    }

    #[test]
    fn test_smart_search_action_reports_matches() {
        let dispatcher = dispatcher();
        create(&dispatcher, "Buy urgent supplies");

        let action =
            Action::from_tool_call("smart_search_todos", &json!({"query": "urgent"})).unwrap();
        let result = dispatcher.execute(&action);

        assert!(result.success);
        assert_eq!(result.message, "Found 1 todos matching: \"urgent\"");
    }

    // ===== resolve_and_act Tests =====

    #[test]
    fn test_resolve_and_act_not_found_leaves_store_unchanged() {
        let dispatcher = dispatcher();
        create(&dispatcher, "Buy milk");

        let result = dispatcher
            .resolve_and_act("taxes", &TitleAction::Delete)
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "No todos found matching: \"taxes\"");
        assert_eq!(dispatcher.store.todos().unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_and_act_ambiguous_never_mutates() {
        let dispatcher = dispatcher();
        let dentist = create(&dispatcher, "Call dentist");
        let plumber = create(&dispatcher, "Call plumber");

        let result = dispatcher
            .resolve_and_act("Call", &TitleAction::Toggle)
            .unwrap();

        assert!(result.is_ambiguous());
        assert!(result.message.contains("1. Call dentist"));
        assert!(result.message.contains("2. Call plumber"));

        // Neither record was written.
        let after_dentist = dispatcher.store.get(&dentist.id).unwrap().unwrap();
        let after_plumber = dispatcher.store.get(&plumber.id).unwrap().unwrap();
        assert!(!after_dentist.completed);
        assert!(!after_plumber.completed);
        assert_eq!(after_dentist.updated_at, dentist.updated_at);
        assert_eq!(after_plumber.updated_at, plumber.updated_at);
    }

    #[test]
    fn test_resolve_and_act_single_match_deletes() {
        let dispatcher = dispatcher();
        let truck = create(&dispatcher, "Fix truck");
        create(&dispatcher, "Buy milk");

        let result = dispatcher
            .resolve_and_act("truck", &TitleAction::Delete)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Successfully deleted todo: \"Fix truck\"");
        assert!(dispatcher.store.get(&truck.id).unwrap().is_none());
    }

    #[test]
    fn test_update_by_title_regenerates_description_for_new_title() {
        let dispatcher = dispatcher();
        create(&dispatcher, "Fix truck");

        let args = UpdateByTitleArgs {
            title: "truck".to_string(),
            new_title: Some("Fix home".to_string()),
            description: None,
            priority: None,
            category: None,
            due_date: None,
            completed: None,
        };
        let result = dispatcher
            .resolve_and_act("truck", &TitleAction::Update(args))
            .unwrap();

        assert!(result.success);
        let updated = result.todo.unwrap();
        assert_eq!(updated.title, "Fix home");
        assert_eq!(updated.description, "Task: Fix home");
    }

    #[test]
    fn test_update_by_title_explicit_description_wins() {
        let dispatcher = dispatcher();
        create(&dispatcher, "Fix truck");

        let args = UpdateByTitleArgs {
            title: "truck".to_string(),
            new_title: Some("Fix home".to_string()),
            description: Some("Call the contractor first".to_string()),
            priority: None,
            category: None,
            due_date: None,
            completed: None,
        };
        let result = dispatcher
            .resolve_and_act("truck", &TitleAction::Update(args))
            .unwrap();

        assert_eq!(
            result.todo.unwrap().description,
            "Call the contractor first"
        );
    }

    #[test]
    fn test_update_by_title_without_new_title_keeps_description() {
        let dispatcher = dispatcher();
        create(&dispatcher, "Fix truck");

        let args = UpdateByTitleArgs {
            title: "truck".to_string(),
            new_title: None,
            description: None,
            priority: Some(Priority::High),
            category: None,
            due_date: None,
            completed: None,
        };
        let result = dispatcher
            .resolve_and_act("truck", &TitleAction::Update(args))
            .unwrap();

        let updated = result.todo.unwrap();
        assert_eq!(updated.description, "Task: Fix truck");
        assert_eq!(updated.priority, Priority::High);
    }

    #[test]
    fn test_toggle_by_title_single_match() {
        let dispatcher = dispatcher();
        create(&dispatcher, "Call dentist");

        let result = dispatcher
            .resolve_and_act("dentist", &TitleAction::Toggle)
            .unwrap();

        assert!(result.success);
        assert_eq!(
            result.message,
            "Successfully completed todo: \"Call dentist\""
        );
    }

    #[test]
    fn test_resolve_and_act_matches_on_description_too() {
        let dispatcher = dispatcher();
        dispatcher
            .create_by_fields(&CreateTodoArgs {
                title: "Write report".to_string(),
                description: Some("this is urgent".to_string()),
                priority: None,
                category: None,
                due_date: None,
                completed: None,
            })
            .unwrap();

        let result = dispatcher
            .resolve_and_act("urgent", &TitleAction::Toggle)
            .unwrap();
        assert!(result.success);
    }
}
