use anyhow::Result;
use clap::Subcommand;

use crate::{
    config::{default_context, resolve_registry},
    registry::{Mode, RegistryClient},
};

#[derive(Subcommand, Debug)]
pub enum ModeCommands {
    /// Show the registry-wide (or one subject's) operating mode
    Get {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    /// Change the operating mode (READWRITE, READONLY, IMPORT)
    Set {
        mode: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
}

pub async fn run(cmd: ModeCommands) -> Result<()> {
    match cmd {
        ModeCommands::Get {
            subject,
            context,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let context = context.or_else(default_context);
            let mode = client
                .get_mode(subject.as_deref(), context.as_deref())
                .await?;
            println!("{mode}");
        }
        ModeCommands::Set {
            mode,
            subject,
            context,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let context = context.or_else(default_context);
            let mode: Mode = mode.parse()?;
            let applied = client
                .set_mode(mode, subject.as_deref(), context.as_deref())
                .await?;
            match subject {
                Some(s) => println!("✅ mode for '{}' is now {}", s, applied),
                None => println!("✅ registry mode is now {}", applied),
            }
        }
    }
    Ok(())
}
