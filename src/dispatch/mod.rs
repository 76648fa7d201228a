// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Action dispatch for Tido
//!
//! Turns a model-selected tool call into a typed [`Action`], resolves fuzzy
//! titles to records, applies mutations, and reports a structured
//! [`ActionResult`] back to the orchestrator.

pub mod action;
pub mod dispatcher;
pub mod result;

pub use action::*;
pub use dispatcher::*;
pub use result::*;
