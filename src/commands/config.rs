use anyhow::Result;
use clap::Subcommand;

use crate::{
    config::{default_context, resolve_registry},
    registry::{RegistryClient, SchemaRegistry},
    snapshot::{CompatibilityConfig, CompatibilityLevel},
};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the global (or one subject's) compatibility configuration
    Get {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    /// Set the global (or one subject's) compatibility level
    Set {
        level: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
}

fn print_config(config: &CompatibilityConfig) {
    println!("compatibility: {}", config.compatibility_level);
    if let Some(normalize) = config.normalize {
        println!("normalize: {normalize}");
    }
    if let Some(default_to_global) = config.default_to_global {
        println!("defaultToGlobal: {default_to_global}");
    }
    if let Some(validate) = config.validate_fields {
        println!("validateFields: {validate}");
    }
}

pub async fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Get {
            subject,
            context,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let context = context.or_else(default_context);

            let config = match &subject {
                Some(s) => client.get_subject_config(s, context.as_deref()).await?,
                None => client.get_global_config(context.as_deref()).await?,
            };
            match config {
                Some(config) => print_config(&config),
                None => match subject {
                    Some(s) => println!("subject '{}' uses the global default", s),
                    None => println!("(no global compatibility configured)"),
                },
            }
        }
        ConfigCommands::Set {
            level,
            subject,
            context,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let context = context.or_else(default_context);

            let level: CompatibilityLevel = level.parse()?;
            let config = CompatibilityConfig::with_level(level);
            match &subject {
                Some(s) => {
                    client
                        .set_subject_config(s, &config, context.as_deref())
                        .await?;
                    println!("✅ set compatibility for '{}' to {}", s, level);
                }
                None => {
                    client.set_global_config(&config, context.as_deref()).await?;
                    println!("✅ set global compatibility to {}", level);
                }
            }
        }
    }
    Ok(())
}
