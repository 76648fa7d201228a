// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! One chat turn, end to end.
//!
//! State machine: receive the message and history, let the model pick at
//! most one cataloged action, execute it exactly once through the
//! dispatcher, feed the structured result back for a natural-language
//! summary, and return the combined reply.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dispatch::{Action, ActionDispatcher, ActionResult};
use crate::error::Result;
use crate::llm::message::{ContentBlock, Message};
use crate::llm::provider::{CompletionRequest, LlmProvider};
use crate::llm::retry::{with_retry, RetryConfig};
use crate::models::ChatMessage;

use super::catalog::{catalog, SYSTEM_PROMPT};

/// Fallback when the model returns no usable text
const FALLBACK_REPLY: &str =
    "I apologize, but I couldn't process your request. Please try again.";

/// Sampling temperature for both turn completions
const TURN_TEMPERATURE: f32 = 0.7;

/// Combined outcome of one chat turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Natural-language reply, glyph-suffixed with the action outcome
    pub message: String,

    /// Name of the executed action, when one was selected
    #[serde(
        rename = "functionCalled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub function_called: Option<String>,

    /// Raw structured result for programmatic consumers
    #[serde(
        rename = "functionResult",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub function_result: Option<ActionResult>,

    #[serde(skip)]
    refresh: bool,
}

impl ChatReply {
    /// Whether external consumers should refresh their todo list.
    ///
    /// Only a successful mutating action signals a refresh; search-only
    /// actions never do, even when the model misused one.
    pub fn triggers_refresh(&self) -> bool {
        self.refresh
    }

    fn plain(message: String) -> Self {
        Self {
            message,
            function_called: None,
            function_result: None,
            refresh: false,
        }
    }
}

/// Runs chat turns against the model and the action dispatcher
pub struct ChatOrchestrator {
    provider: Arc<dyn LlmProvider>,
    dispatcher: ActionDispatcher,
    model: String,
    retry: RetryConfig,
}

impl ChatOrchestrator {
    /// Create an orchestrator for the given provider, dispatcher, and model
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        dispatcher: ActionDispatcher,
        model: impl Into<String>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            model: model.into(),
            retry,
        }
    }

    /// Handle one user turn.
    ///
    /// The two model calls are strictly ordered: the second consumes the
    /// structured result of the action selected by the first. Transient
    /// provider failures are retried with bounded backoff; store faults
    /// never escape the dispatcher.
    pub async fn handle_turn(&self, message: &str, history: &[ChatMessage]) -> Result<ChatReply> {
        let mut messages: Vec<Message> = history.iter().map(Message::from).collect();
        messages.push(Message::user(message));

        let request = CompletionRequest::new(&self.model, messages.clone())
            .with_system(SYSTEM_PROMPT)
            .with_temperature(TURN_TEMPERATURE)
            .with_tools(catalog());

        let response = with_retry(
            || self.provider.complete(request.clone()),
            Some(self.retry.clone()),
            "action selection",
        )
        .await?;

        // The model declined to act: return its text as-is.
        let Some((tool_use_id, name, input)) = response.tool_use() else {
            let text = response.text().unwrap_or(FALLBACK_REPLY).to_string();
            return Ok(ChatReply::plain(text));
        };

        let action = Action::from_tool_call(name, input)?;
        tracing::info!(function = name, "executing model-selected action");
        let result = self.dispatcher.execute(&action);

        // Feed the structured result back for a natural-language summary.
        let mut assistant_blocks = Vec::new();
        if let Some(text) = response.text() {
            assistant_blocks.push(ContentBlock::Text {
                text: text.to_string(),
            });
        }
        assistant_blocks.push(ContentBlock::ToolUse {
            id: tool_use_id.to_string(),
            name: name.to_string(),
            input: input.clone(),
        });

        let mut followup_messages = messages;
        followup_messages.push(Message::assistant_blocks(assistant_blocks));
        followup_messages.push(Message::tool_result(
            tool_use_id,
            serde_json::to_string(&result)?,
            false,
        ));

        let followup_request = CompletionRequest::new(&self.model, followup_messages)
            .with_system(SYSTEM_PROMPT)
            .with_temperature(TURN_TEMPERATURE);

        let followup = with_retry(
            || self.provider.complete(followup_request.clone()),
            Some(self.retry.clone()),
            "result summary",
        )
        .await?;

        let summary = followup.text().unwrap_or(FALLBACK_REPLY);
        let glyph = if result.success { "✅" } else { "❌" };
        let combined = format!("{}\n\n{} {}", summary, glyph, result.message);

        Ok(ChatReply {
            message: combined,
            function_called: Some(name.to_string()),
            refresh: action.is_mutating() && result.success,
            function_result: Some(result),
        })
    }
}
