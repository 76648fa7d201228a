// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! The fixed catalog of callable actions presented to the model,
//! and the system prompt that steers how the model uses them.

use crate::llm::provider::{SchemaBuilder, ToolDefinition};

/// Priority values accepted by the catalog schemas
const PRIORITIES: [&str; 3] = ["high", "medium", "low"];

/// Category slugs accepted by the catalog schemas
const CATEGORIES: [&str; 4] = ["work", "personal", "health", "learning"];

/// System prompt for the todo assistant.
///
/// The model is instructed to always follow a search with the matching
/// action; the dispatcher enforces the same policy even when the model
/// does not comply.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant that manages todos. You are DECISIVE and ACTION-ORIENTED. When a user asks you to do something, DO IT IMMEDIATELY without asking for confirmation.

CRITICAL RULE: You must ALWAYS call the appropriate action function (create, update, delete, toggle) - NEVER just search and stop!

CORE BEHAVIOR:
- Execute actions immediately when requested
- Only ask for clarification if you find MULTIPLE matches or if the request is genuinely ambiguous
- Don't ask for permission - just do what the user asked
- Be concise in your responses
- Always perform the action first, then give a brief confirmation

SEARCH AND ACTION STRATEGY:
- When user asks to change/update: Use update_todo_by_title (which includes smart search)
- When user asks to delete: Use delete_todo_by_title (which includes smart search)
- When user asks to mark complete/toggle: Use toggle_todo_by_title (which includes smart search)
- DON'T use smart_search_todos alone unless user just wants to \"find\" or \"show\" todos
- ALWAYS follow search with the appropriate action

EXAMPLES OF CORRECT BEHAVIOR:
User: \"Change truck to home\" -> Call update_todo_by_title with title=\"truck\", newTitle=\"Buy Home\"
User: \"Delete the TypeScript todo\" -> Call delete_todo_by_title with title=\"TypeScript\"
User: \"Mark dentist as complete\" -> Call toggle_todo_by_title with title=\"dentist\"

WRONG BEHAVIOR (DON'T DO THIS):
User: \"Change truck to home\" -> Call smart_search_todos and then say \"I found it and updated it\" (YOU DIDN'T ACTUALLY UPDATE IT!)";

/// Build the fixed tool catalog: every action the dispatcher can execute
pub fn catalog() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_all_todos".to_string(),
            description: "Get all todos from the database".to_string(),
            input_schema: SchemaBuilder::new().build(),
        },
        ToolDefinition {
            name: "create_todo".to_string(),
            description: "Create a new todo item".to_string(),
            input_schema: SchemaBuilder::new()
                .string("title", "The title of the todo", true)
                .string("description", "A detailed description of the todo", false)
                .string_enum("priority", "Priority of the todo", &PRIORITIES, false)
                .string_enum("category", "Category of the todo", &CATEGORIES, false)
                .string("dueDate", "The due date in YYYY-MM-DD format", false)
                .boolean(
                    "completed",
                    "Whether the todo is initially completed (defaults to false)",
                    false,
                )
                .build(),
        },
        ToolDefinition {
            name: "update_todo".to_string(),
            description: "Update an existing todo by ID".to_string(),
            input_schema: SchemaBuilder::new()
                .string("id", "The ID of the todo to update", true)
                .string("title", "The title of the todo", false)
                .string("description", "A detailed description of the todo", false)
                .string_enum("priority", "Priority of the todo", &PRIORITIES, false)
                .string_enum("category", "Category of the todo", &CATEGORIES, false)
                .string("dueDate", "The due date in YYYY-MM-DD format", false)
                .boolean("completed", "Whether the todo is completed", false)
                .build(),
        },
        ToolDefinition {
            name: "delete_todo".to_string(),
            description: "Delete a todo by ID".to_string(),
            input_schema: SchemaBuilder::new()
                .string("id", "The ID of the todo to delete", true)
                .build(),
        },
        ToolDefinition {
            name: "toggle_todo_completion".to_string(),
            description: "Toggle the completion status of a todo".to_string(),
            input_schema: SchemaBuilder::new()
                .string("id", "The ID of the todo to toggle", true)
                .build(),
        },
        ToolDefinition {
            name: "find_todos_by_title".to_string(),
            description: "Find todos by searching their titles".to_string(),
            input_schema: SchemaBuilder::new()
                .string("title", "The title to search for", true)
                .build(),
        },
        ToolDefinition {
            name: "find_todos_by_description".to_string(),
            description: "Find todos by searching their descriptions".to_string(),
            input_schema: SchemaBuilder::new()
                .string("description", "The description text to search for", true)
                .build(),
        },
        ToolDefinition {
            name: "smart_search_todos".to_string(),
            description: "ONLY for finding/showing todos to the user. DO NOT use this for actions like update/delete/toggle - use the specific action functions instead"
                .to_string(),
            input_schema: SchemaBuilder::new()
                .string(
                    "query",
                    "Search query - can be keywords, phrases, or partial matches",
                    true,
                )
                .build(),
        },
        ToolDefinition {
            name: "delete_todo_by_title".to_string(),
            description: "Delete a todo by searching for it with keywords/partial title. Use this when user wants to delete a todo."
                .to_string(),
            input_schema: SchemaBuilder::new()
                .string(
                    "title",
                    "Keywords or partial title to search for the todo to delete",
                    true,
                )
                .build(),
        },
        ToolDefinition {
            name: "update_todo_by_title".to_string(),
            description: "Update a todo by searching for it with keywords/partial title. Use this when user wants to change/update a todo."
                .to_string(),
            input_schema: SchemaBuilder::new()
                .string(
                    "title",
                    "Keywords or partial title to search for the todo to update",
                    true,
                )
                .string("newTitle", "The new title", false)
                .string("description", "The new description", false)
                .string_enum("priority", "Priority of the todo", &PRIORITIES, false)
                .string_enum("category", "Category of the todo", &CATEGORIES, false)
                .string("dueDate", "The due date in YYYY-MM-DD format", false)
                .boolean("completed", "Whether the todo is completed", false)
                .build(),
        },
        ToolDefinition {
            name: "toggle_todo_by_title".to_string(),
            description: "Toggle completion status of a todo by searching for it with keywords/partial title. Use this when user wants to mark complete/incomplete."
                .to_string(),
            input_schema: SchemaBuilder::new()
                .string(
                    "title",
                    "Keywords or partial title to search for the todo to toggle",
                    true,
                )
                .build(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Action;
    use serde_json::json;

    #[test]
    fn test_catalog_has_eleven_entries() {
        assert_eq!(catalog().len(), 11);
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let defs = catalog();
        let mut names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), defs.len());
    }

    #[test]
    fn test_every_catalog_entry_decodes_to_an_action() {
        // Minimal valid arguments per entry, matching each schema's
        // required list.
        let minimal_args = |name: &str| match name {
            "get_all_todos" => json!({}),
            "create_todo" => json!({"title": "x"}),
            "update_todo" | "delete_todo" | "toggle_todo_completion" => json!({"id": "1"}),
            "find_todos_by_title"
            | "delete_todo_by_title"
            | "update_todo_by_title"
            | "toggle_todo_by_title" => json!({"title": "x"}),
            "find_todos_by_description" => json!({"description": "x"}),
            "smart_search_todos" => json!({"query": "x"}),
            other => panic!("unexpected catalog entry {}", other),
        };

        for def in catalog() {
            let action = Action::from_tool_call(&def.name, &minimal_args(&def.name))
                .unwrap_or_else(|e| panic!("{} failed to decode: {}", def.name, e));
            assert_eq!(action.name(), def.name);
        }
    }

    #[test]
    fn test_required_fields_match_schemas() {
        let defs = catalog();
        let by_name = |name: &str| {
            defs.iter()
                .find(|d| d.name == name)
                .unwrap_or_else(|| panic!("missing {}", name))
        };

        assert_eq!(by_name("create_todo").input_schema.required, vec!["title"]);
        assert_eq!(by_name("update_todo").input_schema.required, vec!["id"]);
        assert_eq!(
            by_name("smart_search_todos").input_schema.required,
            vec!["query"]
        );
        assert!(by_name("get_all_todos").input_schema.required.is_empty());
    }

    #[test]
    fn test_priority_enum_values_in_schema() {
        let defs = catalog();
        let create = defs.iter().find(|d| d.name == "create_todo").unwrap();
        assert_eq!(
            create.input_schema.properties["priority"]["enum"],
            json!(["high", "medium", "low"])
        );
        assert_eq!(
            create.input_schema.properties["category"]["enum"],
            json!(["work", "personal", "health", "learning"])
        );
    }
}
