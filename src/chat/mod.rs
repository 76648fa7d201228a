// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Conversation orchestration for Tido
//!
//! Exposes the fixed action catalog to the model and runs the two-call
//! turn state machine: select an action, execute it, summarize the result.

pub mod catalog;
pub mod orchestrator;

pub use catalog::*;
pub use orchestrator::*;
