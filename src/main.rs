//! # srctl
//!
//! A Rust command-line client for Confluent-compatible schema registries.
//!
//! ## Features
//!
//! - 📋 **Subject management** - List subjects and versions, fetch, register, and delete schemas
//! - 🔁 **Snapshot migration** - Export registry state to portable JSON files and replay them elsewhere
//! - ⚙️ **Compatibility & mode** - Inspect and change compatibility levels and operating modes
//! - 🔐 **Flexible authentication** - Basic, token, and bearer authentication support
//! - 🌐 **Multi-registry support** - Work with several registries from one config
//!
//! ## Quick Start
//!
//! ```bash
//! # Scaffold a project config
//! srctl init
//!
//! # List subjects
//! srctl subjects
//!
//! # Export everything, all versions, with config
//! srctl export subjects --dir ./snapshots --all-versions --include-config
//!
//! # Replay into another registry
//! srctl import subjects --dir ./snapshots --registry staging --skip-existing
//! ```
//!
//! ## Configuration
//!
//! Project settings live in `srctlconfig.yaml`; shared registries can be
//! configured in `~/.config/srctl/registries.yaml` (or the file named by
//! `SRCTL_REGISTRIES_PATH`).

use anyhow::Result;
use clap::Parser;
use srctl::{commands, Cli};

/// Main entry point for srctl
///
/// Parses command-line arguments and delegates to the appropriate command
/// handler. If no command is provided, displays an error message and exits.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    commands::run(cmd).await
}
