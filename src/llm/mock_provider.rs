// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Mock LLM provider for testing
//!
//! Provides a configurable mock implementation of the LlmProvider trait
//! that can be used in tests without making real API calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, ContentBlockResponse, LlmProvider, StopReason, Usage,
};

/// A mock LLM provider for testing
#[derive(Clone, Default)]
pub struct MockProvider {
    /// Queued responses, returned in order
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Call counter
    call_count: Arc<AtomicUsize>,
    /// Recorded requests
    recorded_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A pre-configured response for the mock provider
#[derive(Clone, Debug, Default)]
pub struct MockResponse {
    /// Text content to return
    pub text: Option<String>,
    /// Tool call to return (id, name, input)
    pub tool_call: Option<(String, String, serde_json::Value)>,
}

impl MockProvider {
    /// Create a new mock provider with no queued responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text response
    pub fn push_text(&self, text: impl Into<String>) {
        self.lock_responses().push_back(MockResponse {
            text: Some(text.into()),
            tool_call: None,
        });
    }

    /// Queue a tool-call response
    pub fn push_tool_call(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) {
        self.lock_responses().push_back(MockResponse {
            text: None,
            tool_call: Some((id.into(), name.into(), input)),
        });
    }

    /// Builder-style text response
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Builder-style tool-call response
    pub fn with_tool_call(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        self.push_tool_call(id, name, input);
        self
    }

    /// Number of completion calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Copies of every request received
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        match self.recorded_requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<MockResponse>> {
        match self.responses.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let turn = self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.recorded_requests.lock() {
            Ok(mut guard) => guard.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        let scripted = self.lock_responses().pop_front().unwrap_or_default();

        let mut content = Vec::new();
        if let Some(text) = scripted.text {
            content.push(ContentBlockResponse::Text { text });
        }
        let stop_reason = if let Some((id, name, input)) = scripted.tool_call {
            content.push(ContentBlockResponse::ToolUse { id, name, input });
            StopReason::ToolUse
        } else {
            StopReason::EndTurn
        };
        if content.is_empty() {
            content.push(ContentBlockResponse::Text {
                text: "Okay.".to_string(),
            });
        }

        Ok(CompletionResponse {
            id: format!("mock_{}", turn),
            model: request.model,
            content,
            stop_reason: Some(stop_reason),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::Message;

    #[tokio::test]
    async fn test_mock_returns_queued_text() {
        let provider = MockProvider::new().with_text("Hello!");
        let response = provider
            .complete(CompletionRequest::new("mock-model", vec![Message::user("hi")]))
            .await
            .unwrap();

        assert_eq!(response.text(), Some("Hello!"));
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    }

    #[tokio::test]
    async fn test_mock_returns_queued_tool_call() {
        let provider = MockProvider::new().with_tool_call(
            "call_1",
            "smart_search_todos",
            serde_json::json!({"query": "truck"}),
        );
        let response = provider
            .complete(CompletionRequest::new("mock-model", vec![Message::user("hi")]))
            .await
            .unwrap();

        let (id, name, input) = response.tool_use().unwrap();
        assert_eq!(id, "call_1");
        assert_eq!(name, "smart_search_todos");
        assert_eq!(input["query"], "truck");
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
    }

    #[tokio::test]
    async fn test_mock_drains_responses_in_order() {
        let provider = MockProvider::new().with_text("first").with_text("second");
        let request = CompletionRequest::new("mock-model", vec![Message::user("hi")]);

        let first = provider.complete(request.clone()).await.unwrap();
        let second = provider.complete(request.clone()).await.unwrap();
        // Queue empty: falls back to a default acknowledgement.
        let third = provider.complete(request).await.unwrap();

        assert_eq!(first.text(), Some("first"));
        assert_eq!(second.text(), Some("second"));
        assert_eq!(third.text(), Some("Okay."));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let provider = MockProvider::new().with_text("ok");
        let request = CompletionRequest::new("mock-model", vec![Message::user("remember me")])
            .with_system("system prompt");
        provider.complete(request).await.unwrap();

        let recorded = provider.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].system.as_deref(), Some("system prompt"));
    }
}
