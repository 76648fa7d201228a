// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tido - the AI todo assistant
#[derive(Parser, Debug)]
#[command(name = "tido")]
#[command(version, about = "AI todo assistant with natural-language task management")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default when no command given)
    Serve(ServeArgs),
}

/// Arguments for the serve subcommand
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Bind address (overrides settings)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides settings)
    #[arg(long)]
    pub port: Option<u16>,

    /// SQLite database path (overrides settings)
    #[arg(long)]
    pub db: Option<PathBuf>,
}
