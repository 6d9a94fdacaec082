use anyhow::{anyhow, Result};
use clap::Subcommand;
use std::io;
use std::path::{Path, PathBuf};

use crate::{
    config::{default_context, resolve_registry},
    export::{build_snapshot, ExportOptions},
    registry::{RegistryClient, SchemaRegistry},
    snapshot::{Snapshot, SnapshotMetadata},
};

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export one subject to a file, a directory, or stdout
    Subject {
        subject: String,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        all_versions: bool,
        #[arg(long)]
        include_config: bool,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
    /// Export every subject (optionally scoped to one context)
    Subjects {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        all_versions: bool,
        #[arg(long)]
        include_config: bool,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        registry: Option<String>,
    },
}

fn write_snapshot(snapshot: &Snapshot, file: Option<&Path>) -> Result<()> {
    match file {
        Some(path) => {
            snapshot.save(path)?;
            println!(
                "✅ exported {} subject(s), {} version(s) to {}",
                snapshot.subjects.len(),
                snapshot.version_count(),
                path.display()
            );
        }
        None => snapshot.write_to(io::stdout().lock())?,
    }
    Ok(())
}

/// Bulk export into a directory: one independently importable
/// single-subject snapshot per subject, sharing the same metadata.
async fn export_to_directory(
    client: &RegistryClient,
    subjects: &[String],
    opts: &ExportOptions,
    metadata: &SnapshotMetadata,
    dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for subject in subjects {
        let snapshot =
            build_snapshot(client, std::slice::from_ref(subject), opts, metadata.clone()).await?;
        let path = dir.join(format!("{}.json", subject));
        snapshot.save(&path)?;
        println!("  {} → {}", subject, path.display());
    }
    println!("✅ exported {} subject(s) to {}", subjects.len(), dir.display());
    Ok(())
}

pub async fn run(cmd: ExportCommands) -> Result<()> {
    match cmd {
        ExportCommands::Subject {
            subject,
            file,
            dir,
            all_versions,
            include_config,
            context,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let opts = ExportOptions {
                all_versions,
                include_config,
                context: context.or_else(default_context),
            };
            let metadata =
                SnapshotMetadata::capture(opts.context.clone(), Some(client.base_url.clone()));

            let subjects = vec![subject];
            match dir {
                Some(dir) => export_to_directory(&client, &subjects, &opts, &metadata, &dir).await,
                None => {
                    let snapshot = build_snapshot(&client, &subjects, &opts, metadata).await?;
                    write_snapshot(&snapshot, file.as_deref())
                }
            }
        }
        ExportCommands::Subjects {
            file,
            dir,
            all_versions,
            include_config,
            context,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let opts = ExportOptions {
                all_versions,
                include_config,
                context: context.or_else(default_context),
            };
            let metadata =
                SnapshotMetadata::capture(opts.context.clone(), Some(client.base_url.clone()));

            let subjects = client.list_subjects(opts.context.as_deref()).await?;
            if subjects.is_empty() {
                return Err(anyhow!("registry has no subjects to export"));
            }

            match dir {
                Some(dir) => export_to_directory(&client, &subjects, &opts, &metadata, &dir).await,
                None => {
                    let snapshot = build_snapshot(&client, &subjects, &opts, metadata).await?;
                    write_snapshot(&snapshot, file.as_deref())
                }
            }
        }
    }
}
