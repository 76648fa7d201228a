// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! LLM provider trait and related types
//!
//! Defines the abstraction layer for the model-completion collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::llm::message::Message;

/// Main trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "mock")
    fn name(&self) -> &str;

    /// Non-streaming completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Request for completion
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model to use
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// System prompt
    pub system: Option<String>,

    /// Maximum tokens in response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Tools available for the model to use
    pub tools: Vec<ToolDefinition>,

    /// How to handle tool choice
    pub tool_choice: ToolChoice,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Response ID
    pub id: String,

    /// Model used
    pub model: String,

    /// Response content
    pub content: Vec<ContentBlockResponse>,

    /// Stop reason
    pub stop_reason: Option<StopReason>,

    /// Token usage
    pub usage: Usage,
}

/// A content block in the response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlockResponse {
    /// Text content
    Text { text: String },

    /// Tool use request
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of message
    EndTurn,
    /// Hit max tokens
    MaxTokens,
    /// Wants to use a tool
    ToolUse,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens
    pub input_tokens: u32,
    /// Output tokens
    pub output_tokens: u32,
}

/// Tool definition for the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Tool description
    pub description: String,

    /// Input schema (JSON Schema)
    pub input_schema: ToolInputSchema,
}

/// Input schema for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    /// Schema type (always "object")
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Property definitions
    pub properties: Value,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// How the model should choose to use tools
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolChoice {
    /// Let the model decide
    #[default]
    Auto,
    /// Don't use any tools
    None,
    /// Must use a tool
    Required,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            system: None,
            max_tokens: 1024,
            temperature: 0.7,
            tools: vec![],
            tool_choice: ToolChoice::Auto,
        }
    }

    /// Set the system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set tool choice
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }
}

impl CompletionResponse {
    /// First text block of the response, if any
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlockResponse::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// First tool use block of the response, if any
    pub fn tool_use(&self) -> Option<(&str, &str, &Value)> {
        self.content.iter().find_map(|block| match block {
            ContentBlockResponse::ToolUse { id, name, input } => {
                Some((id.as_str(), name.as_str(), input))
            }
            _ => None,
        })
    }
}

impl Usage {
    /// Get total tokens used
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Helper to create a tool input schema
pub struct SchemaBuilder {
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            properties: serde_json::Map::new(),
            required: vec![],
        }
    }

    /// Add a string property
    pub fn string(mut self, name: &str, description: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "string",
                "description": description
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a string property restricted to a fixed set of values
    pub fn string_enum(
        mut self,
        name: &str,
        description: &str,
        values: &[&str],
        required: bool,
    ) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "string",
                "description": description,
                "enum": values
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a boolean property
    pub fn boolean(mut self, name: &str, description: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "boolean",
                "description": description
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Build the schema
    pub fn build(self) -> ToolInputSchema {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties: Value::Object(self.properties),
            required: self.required,
        }
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== CompletionRequest Tests =====

    #[test]
    fn test_completion_request_new() {
        let messages = vec![Message::user("Hello")];
        let request = CompletionRequest::new("gpt-4o", messages);

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.messages.len(), 1);
        assert!((request.temperature - 0.7).abs() < 0.001);
        assert!(request.system.is_none());
        assert!(request.tools.is_empty());
    }

    #[test]
    fn test_completion_request_chained() {
        let request = CompletionRequest::new("gpt-4o", vec![Message::user("Hello")])
            .with_system("You manage todos")
            .with_max_tokens(2048)
            .with_temperature(0.2)
            .with_tool_choice(ToolChoice::None);

        assert_eq!(request.system, Some("You manage todos".to_string()));
        assert_eq!(request.max_tokens, 2048);
        assert!((request.temperature - 0.2).abs() < 0.001);
        assert_eq!(request.tool_choice, ToolChoice::None);
    }

    #[test]
    fn test_tool_choice_default() {
        assert_eq!(ToolChoice::default(), ToolChoice::Auto);
    }

    // ===== CompletionResponse Tests =====

    fn response_with(content: Vec<ContentBlockResponse>) -> CompletionResponse {
        CompletionResponse {
            id: "resp_1".to_string(),
            model: "gpt-4o".to_string(),
            content,
            stop_reason: Some(StopReason::EndTurn),
            usage: Usage::default(),
        }
    }

    #[test]
    fn test_response_text_accessor() {
        let response = response_with(vec![ContentBlockResponse::Text {
            text: "All done".to_string(),
        }]);
        assert_eq!(response.text(), Some("All done"));
        assert!(response.tool_use().is_none());
    }

    #[test]
    fn test_response_tool_use_accessor() {
        let response = response_with(vec![
            ContentBlockResponse::Text {
                text: "Let me check".to_string(),
            },
            ContentBlockResponse::ToolUse {
                id: "call_1".to_string(),
                name: "smart_search_todos".to_string(),
                input: serde_json::json!({"query": "truck"}),
            },
        ]);

        let (id, name, input) = response.tool_use().unwrap();
        assert_eq!(id, "call_1");
        assert_eq!(name, "smart_search_todos");
        assert_eq!(input["query"], "truck");
    }

    #[test]
    fn test_usage_total_tokens() {
        let usage = Usage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total_tokens(), 150);
    }

    // ===== SchemaBuilder Tests =====

    #[test]
    fn test_schema_builder_string_required() {
        let schema = SchemaBuilder::new()
            .string("title", "The title of the todo", true)
            .build();

        assert_eq!(schema.schema_type, "object");
        assert!(schema.required.contains(&"title".to_string()));
        assert_eq!(schema.properties["title"]["type"], "string");
    }

    #[test]
    fn test_schema_builder_enum_values() {
        let schema = SchemaBuilder::new()
            .string_enum("priority", "Priority level", &["high", "medium", "low"], false)
            .build();

        assert!(schema.required.is_empty());
        assert_eq!(
            schema.properties["priority"]["enum"],
            serde_json::json!(["high", "medium", "low"])
        );
    }

    #[test]
    fn test_schema_builder_chaining() {
        let schema = SchemaBuilder::new()
            .string("title", "Title", true)
            .boolean("completed", "Completed flag", false)
            .string_enum("priority", "Priority", &["high", "medium", "low"], false)
            .build();

        if let Value::Object(props) = &schema.properties {
            assert_eq!(props.len(), 3);
        } else {
            panic!("expected object properties");
        }
        assert_eq!(schema.required, vec!["title".to_string()]);
    }

    #[test]
    fn test_schema_builder_empty_build() {
        let schema = SchemaBuilder::new().build();
        assert_eq!(schema.schema_type, "object");
        assert!(schema.required.is_empty());
    }
}
