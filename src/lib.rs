//! # srctl Library
//!
//! Core library functionality for the srctl tool.

use clap::Parser;

pub mod commands;
pub mod config;
pub mod constants;
pub mod export;
pub mod import;
pub mod registry;
pub mod snapshot;

/// CLI tool for managing schemas in Confluent-compatible schema registries
///
/// srctl talks to a schema registry's REST API to manage subjects, schema
/// versions, compatibility configuration, and operating mode, and can
/// migrate registry state between environments through portable JSON
/// snapshot files.
#[derive(Parser)]
#[command(
    name = "srctl",
    version,
    about = "CLI tool for managing schemas in a Confluent-compatible schema registry",
    long_about = "A Rust command-line client for Confluent-compatible schema registries.\n\nManage subjects, schema versions, compatibility configuration, and operating mode,\nand migrate registry state between environments via portable snapshot files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}
