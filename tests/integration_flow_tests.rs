// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! End-to-end flows: a scripted provider drives the orchestrator against a
//! real on-disk store, exercising the full turn state machine.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use tido::chat::ChatOrchestrator;
use tido::config::TodoDefaults;
use tido::dispatch::{ActionDispatcher, CreateTodoArgs};
use tido::llm::mock_provider::MockProvider;
use tido::llm::retry::RetryConfig;
use tido::models::{Priority, Todo};
use tido::store::{RecordStore, SqliteStore};

struct Harness {
    _dir: TempDir,
    store: Arc<SqliteStore>,
    provider: MockProvider,
    orchestrator: ChatOrchestrator,
}

fn harness() -> Harness {
    let dir = TempDir::new().expect("temp dir should be created");
    let store = Arc::new(SqliteStore::open(dir.path().join("todos.db")).expect("store opens"));
    store
        .ensure_default_categories()
        .expect("categories should seed");

    let provider = MockProvider::new();
    let dispatcher = ActionDispatcher::new(
        store.clone() as Arc<dyn RecordStore>,
        TodoDefaults::default(),
    );
    let orchestrator = ChatOrchestrator::new(
        Arc::new(provider.clone()),
        dispatcher,
        "mock-model",
        RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
            max_delay_ms: 1,
            jitter: 0.0,
        },
    );

    Harness {
        _dir: dir,
        store,
        provider,
        orchestrator,
    }
}

fn seed_todo(store: &SqliteStore, title: &str) -> Todo {
    let defaults = TodoDefaults::default();
    store
        .create(tido::models::TodoDraft {
            title: title.to_string(),
            description: defaults.description_for(title),
            completed: false,
            priority: Priority::Medium,
            category: defaults.category.clone(),
            due_date: defaults.due_date(),
        })
        .expect("seed todo should insert")
}

#[tokio::test]
async fn test_fuzzy_update_truck_to_fix_home() {
    let h = harness();
    let original = seed_todo(&h.store, "Fix truck");

    h.provider.push_tool_call(
        "call_1",
        "update_todo_by_title",
        json!({"title": "truck", "newTitle": "Fix home"}),
    );
    h.provider.push_text("Renamed the truck todo to Fix home.");

    let reply = h
        .orchestrator
        .handle_turn("change truck to fix home", &[])
        .await
        .expect("turn should complete");

    assert_eq!(reply.function_called.as_deref(), Some("update_todo_by_title"));
    assert!(reply.triggers_refresh());
    assert!(reply
        .message
        .contains("✅ Successfully updated todo: \"Fix home\""));

    let result = reply.function_result.expect("result should be attached");
    assert!(result.success);
    let updated = result.todo.expect("updated record should be attached");
    assert_eq!(updated.title, "Fix home");
    assert_eq!(updated.description, "Task: Fix home");
    assert!(updated.updated_at > updated.created_at);

    // The store reflects the mutation.
    let stored = h.store.get(&original.id).expect("get").expect("exists");
    assert_eq!(stored.title, "Fix home");
    assert_eq!(stored.description, "Task: Fix home");
    assert!(stored.updated_at > stored.created_at);
}

#[tokio::test]
async fn test_ambiguous_toggle_call_leaves_store_unchanged() {
    let h = harness();
    let dentist = seed_todo(&h.store, "Call dentist");
    let plumber = seed_todo(&h.store, "Call plumber");

    h.provider
        .push_tool_call("call_1", "toggle_todo_by_title", json!({"title": "Call"}));
    h.provider.push_text("I found more than one match.");

    let reply = h
        .orchestrator
        .handle_turn("mark call as done", &[])
        .await
        .expect("turn should complete");

    let result = reply.function_result.clone().expect("result should be attached");
    assert!(!result.success);
    assert!(result.is_ambiguous());
    assert!(result
        .message
        .contains("Multiple todos found matching \"Call\""));
    assert!(result.message.contains("1. Call dentist"));
    assert!(result.message.contains("2. Call plumber"));
    assert_eq!(result.todos.expect("candidates attached").len(), 2);
    assert!(!reply.triggers_refresh());
    assert!(reply.message.contains("❌"));

    // Neither candidate was written.
    for original in [&dentist, &plumber] {
        let stored = h.store.get(&original.id).expect("get").expect("exists");
        assert!(!stored.completed);
        assert_eq!(stored.updated_at, original.updated_at);
    }
}

#[tokio::test]
async fn test_default_categories_seed_exactly_once() {
    let dir = TempDir::new().expect("temp dir should be created");
    let store = SqliteStore::open(dir.path().join("todos.db")).expect("store opens");

    assert!(store.categories().expect("categories").is_empty());

    store.ensure_default_categories().expect("first seed");
    let first = store.categories().expect("categories");
    assert_eq!(first.len(), 4);

    store.ensure_default_categories().expect("second seed");
    let second = store.categories().expect("categories");
    assert_eq!(second.len(), 4);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_toggle_round_trip_through_chat() {
    let h = harness();
    let todo = seed_todo(&h.store, "Water plants");

    h.provider
        .push_tool_call("call_1", "toggle_todo_by_title", json!({"title": "plants"}));
    h.provider.push_text("Marked it done.");
    h.provider
        .push_tool_call("call_2", "toggle_todo_by_title", json!({"title": "plants"}));
    h.provider.push_text("Back to pending.");

    let done = h
        .orchestrator
        .handle_turn("finish watering", &[])
        .await
        .expect("first toggle");
    assert!(done
        .message
        .contains("✅ Successfully completed todo: \"Water plants\""));

    let after_first = h.store.get(&todo.id).expect("get").expect("exists");
    assert!(after_first.completed);
    assert!(after_first.updated_at > todo.updated_at);

    let undone = h
        .orchestrator
        .handle_turn("actually not done", &[])
        .await
        .expect("second toggle");
    assert!(undone
        .message
        .contains("✅ Successfully uncompleted todo: \"Water plants\""));

    let after_second = h.store.get(&todo.id).expect("get").expect("exists");
    assert!(!after_second.completed);
    assert!(after_second.updated_at > after_first.updated_at);
}

#[tokio::test]
async fn test_delete_by_title_not_found_reports_failure() {
    let h = harness();
    seed_todo(&h.store, "Buy milk");

    h.provider
        .push_tool_call("call_1", "delete_todo_by_title", json!({"title": "taxes"}));
    h.provider.push_text("Nothing matched.");

    let reply = h
        .orchestrator
        .handle_turn("delete the taxes todo", &[])
        .await
        .expect("turn should complete");

    let result = reply.function_result.expect("result attached");
    assert!(!result.success);
    assert_eq!(result.message, "No todos found matching: \"taxes\"");
    assert_eq!(h.store.todos().expect("todos").len(), 1);
}

#[tokio::test]
async fn test_create_defaults_flow_through_dispatcher() {
    let h = harness();
    let dispatcher = ActionDispatcher::new(
        h.store.clone() as Arc<dyn RecordStore>,
        TodoDefaults::default(),
    );

    let todo = dispatcher
        .create_by_fields(&CreateTodoArgs {
            title: "Read a book".to_string(),
            description: None,
            priority: None,
            category: None,
            due_date: None,
            completed: None,
        })
        .expect("create should succeed");

    assert_eq!(todo.description, "Task: Read a book");
    assert_eq!(todo.priority, Priority::Medium);
    assert_eq!(todo.category, "personal");
    assert!(!todo.completed);
}
