// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! LLM provider implementations

pub mod openai;

pub use openai::OpenAiProvider;
