use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

pub mod completions;
pub mod config;
pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod init;
pub mod mode;
pub mod register;
pub mod registry;
pub mod subjects;
pub mod versions;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Scaffold a blank srctlconfig.yaml in a new repo")]
    Init,
    #[command(about = "List subjects in the registry (optionally scoped to one context)")]
    Subjects {
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    #[command(about = "List version numbers registered under a subject")]
    Versions {
        subject: String,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    #[command(about = "Fetch one schema version (latest by default) and print its payload")]
    Get {
        subject: String,
        #[arg(long)]
        version: Option<u32>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    #[command(about = "Register a schema file as a new version of a subject")]
    Register {
        subject: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long = "type")]
        schema_type: Option<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    #[command(about = "Delete a subject, or one version of it (soft delete unless --permanent)")]
    Delete {
        subject: String,
        #[arg(long)]
        version: Option<u32>,
        #[arg(long)]
        permanent: bool,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    #[command(about = "Get or set compatibility configuration (global or per subject)")]
    Config {
        #[command(subcommand)]
        cmd: config::ConfigCommands,
    },
    #[command(about = "Get or set the operating mode (global or per subject)")]
    Mode {
        #[command(subcommand)]
        cmd: mode::ModeCommands,
    },
    #[command(about = "Export subjects and configuration to snapshot files")]
    Export {
        #[command(subcommand)]
        cmd: export::ExportCommands,
    },
    #[command(about = "Replay snapshot files against a target registry")]
    Import {
        #[command(subcommand)]
        cmd: import::ImportCommands,
    },
    #[command(about = "Subcommand: manage global registries file (add/list/remove)")]
    Registry {
        #[command(subcommand)]
        cmd: registry::RegistryCommands,
    },
    #[command(about = "Emit shell completion scripts (bash/zsh/fish)")]
    Completions { shell: String },
}

pub async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init => init::run().await,
        Commands::Subjects { context, registry } => subjects::run(registry, context).await,
        Commands::Versions {
            subject,
            context,
            registry,
        } => versions::run(registry, subject, context).await,
        Commands::Get {
            subject,
            version,
            context,
            registry,
        } => get::run(registry, subject, version, context).await,
        Commands::Register {
            subject,
            file,
            schema_type,
            context,
            registry,
        } => register::run(registry, subject, file, schema_type, context).await,
        Commands::Delete {
            subject,
            version,
            permanent,
            yes,
            context,
            registry,
        } => delete::run(registry, subject, version, permanent, yes, context).await,
        Commands::Config { cmd } => config::run(cmd).await,
        Commands::Mode { cmd } => mode::run(cmd).await,
        Commands::Export { cmd } => export::run(cmd).await,
        Commands::Import { cmd } => import::run(cmd).await,
        Commands::Registry { cmd } => registry::run(cmd).await,
        Commands::Completions { shell } => completions::run(shell),
    }
}
