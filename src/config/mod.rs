// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Configuration module for Tido
//!
//! Handles loading, saving, and managing user settings.

pub mod settings;

pub use settings::*;
