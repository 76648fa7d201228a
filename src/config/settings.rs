// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Settings management for Tido
//!
//! Handles loading and saving settings from ~/.tido/settings.json

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TidoError};
use crate::models::Priority;

/// Placeholder value that must never be sent as a credential
const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Main settings structure, stored in ~/.tido/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Model-completion provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Defaults applied when the model or a client omits todo fields
    #[serde(default)]
    pub defaults: TodoDefaults,

    /// Retry and resilience settings for API calls
    #[serde(default)]
    pub resilience: ResilienceConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration for the OpenAI-compatible completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model to use for both turn completions
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the API (for custom endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: None,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key, checked eagerly before any model call.
    ///
    /// Prefers the directly-stored key, then the configured environment
    /// variable. A missing or placeholder key is a configuration error with
    /// an instructive message.
    pub fn resolve_api_key(&self) -> Result<String> {
        let key = self
            .api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok());

        match key {
            Some(key) if !key.trim().is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(TidoError::Config(format!(
                "No API key configured. Set the {} environment variable or add provider.api_key to {}.",
                self.api_key_env,
                Settings::settings_path().display()
            ))),
        }
    }
}

/// Centralized defaults for todo creation and fuzzy-title updates.
///
/// Both paths consume this one structure so the default category, priority,
/// and description template cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoDefaults {
    /// Category assigned when none is given
    #[serde(default = "default_category")]
    pub category: String,

    /// Priority assigned when none is given
    #[serde(default)]
    pub priority: Priority,
}

impl Default for TodoDefaults {
    fn default() -> Self {
        Self {
            category: default_category(),
            priority: Priority::default(),
        }
    }
}

impl TodoDefaults {
    /// Description derived from a title when none is supplied
    pub fn description_for(&self, title: &str) -> String {
        format!("Task: {}", title)
    }

    /// Due date assigned when none is given (today)
    pub fn due_date(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Retry configuration for calls to the completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (cap for backoff)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Jitter percentage (0.0 to 1.0) for randomizing delays
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database path (defaults to ~/.tido/todos.db)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: None,
        }
    }
}

impl Settings {
    /// Tido home directory (~/.tido)
    pub fn tido_home() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tido")
    }

    /// Path to the settings file
    pub fn settings_path() -> PathBuf {
        Self::tido_home().join("settings.json")
    }

    /// Load settings from disk, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = Self::settings_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&content)
            .map_err(|e| TidoError::Config(format!("Invalid settings file: {}", e)))?;
        Ok(settings)
    }

    /// Save settings to disk, creating ~/.tido if needed
    pub fn save(&self) -> Result<()> {
        let home = Self::tido_home();
        std::fs::create_dir_all(&home)?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::settings_path(), content)?;
        Ok(())
    }

    /// Resolve the database path (explicit setting or ~/.tido/todos.db)
    pub fn db_path(&self) -> PathBuf {
        self.server
            .db_path
            .clone()
            .unwrap_or_else(|| Self::tido_home().join("todos.db"))
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_category() -> String {
    "personal".to_string()
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    16000
}

fn default_jitter() -> f64 {
    0.25
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}
