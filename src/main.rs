// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Tido - AI todo assistant
//!
//! Entry point for the Tido server binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tido::api::{self, ApiState, ChatBackend};
use tido::chat::ChatOrchestrator;
use tido::cli::{Cli, Commands, ServeArgs};
use tido::config::Settings;
use tido::dispatch::ActionDispatcher;
use tido::llm::providers::OpenAiProvider;
use tido::llm::retry::RetryConfig;
use tido::llm::LlmProvider;
use tido::store::{RecordStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tido=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await,
        None => serve(ServeArgs::default()).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(db) = args.db {
        settings.server.db_path = Some(db);
    }

    let db_path = settings.db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let store = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open store at {}", db_path.display()))?,
    );
    // Seed categories before the first create can reference them.
    store.ensure_default_categories()?;
    tracing::info!(db = %db_path.display(), "todo store ready");

    let dispatcher = ActionDispatcher::new(
        store.clone() as Arc<dyn RecordStore>,
        settings.defaults.clone(),
    );

    let chat = match settings.provider.resolve_api_key() {
        Ok(api_key) => {
            let provider: Arc<dyn LlmProvider> = match &settings.provider.base_url {
                Some(base_url) => Arc::new(OpenAiProvider::with_base_url(api_key, base_url)),
                None => Arc::new(OpenAiProvider::new(api_key)),
            };
            let orchestrator = ChatOrchestrator::new(
                provider,
                dispatcher,
                settings.provider.model.clone(),
                RetryConfig::from(&settings.resilience),
            );
            tracing::info!(model = %settings.provider.model, "chat assistant ready");
            ChatBackend::Ready(Arc::new(orchestrator))
        }
        Err(err) => {
            tracing::warn!(error = %err, "chat assistant disabled");
            ChatBackend::Unconfigured {
                reason: err.to_string(),
            }
        }
    };

    let state = ApiState {
        store: store as Arc<dyn RecordStore>,
        chat,
    };
    let app = api::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await.context("server error")
}
