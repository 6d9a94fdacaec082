use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::{
    config::{default_context, resolve_registry},
    import::{import_directory, import_snapshot, ImportOptions, ImportStatus, ImportSummary},
    registry::RegistryClient,
    snapshot::Snapshot,
};

/// Above this many results the per-item listing is only shown when
/// something went wrong.
const DETAIL_THRESHOLD: usize = 20;

#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Replay one snapshot file
    Subject {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        import_context: Option<String>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        skip_existing: bool,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        registry: Option<String>,
    },
    /// Replay every snapshot file in a directory, in lexical order
    Subjects {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        import_context: Option<String>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        skip_existing: bool,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        registry: Option<String>,
    },
}

fn print_summary(summary: &ImportSummary) {
    println!();
    println!(
        "Import summary: total={} created={} existing={} errors={} skipped={}",
        summary.total, summary.created, summary.existing, summary.errors, summary.skipped
    );
    if summary.errors == 0 && summary.results.len() > DETAIL_THRESHOLD {
        return;
    }
    for result in &summary.results {
        match result.status {
            ImportStatus::Created => println!(
                "  ✅ {} v{} → id {}",
                result.subject,
                result.version,
                result.id.map(|id| id.to_string()).unwrap_or_default()
            ),
            ImportStatus::Existing => println!(
                "  ✔️  {} v{} already present (id {})",
                result.subject,
                result.version,
                result.id.map(|id| id.to_string()).unwrap_or_default()
            ),
            ImportStatus::Skipped => {
                println!("  ⚪ {} v{} skipped (dry run)", result.subject, result.version)
            }
            ImportStatus::Error => println!(
                "  ❌ {} v{}: {}",
                result.subject,
                result.version,
                result.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// Prints the summary, then exits non-zero if anything errored. Skipped
/// and existing results leave the exit status alone.
fn finish(summary: ImportSummary) -> Result<()> {
    print_summary(&summary);
    if summary.errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

pub async fn run(cmd: ImportCommands) -> Result<()> {
    match cmd {
        ImportCommands::Subject {
            file,
            import_context,
            dry_run,
            skip_existing,
            force,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let opts = ImportOptions {
                dry_run,
                skip_existing,
                force,
                import_context,
                default_context: default_context(),
            };
            let snapshot = Snapshot::load(&file)?;
            let summary = import_snapshot(&client, &snapshot, &opts).await?;
            finish(summary)
        }
        ImportCommands::Subjects {
            dir,
            import_context,
            dry_run,
            skip_existing,
            force,
            registry,
        } => {
            let cfg = resolve_registry(registry.as_deref())?;
            let client = RegistryClient::new(&cfg)?;
            let opts = ImportOptions {
                dry_run,
                skip_existing,
                force,
                import_context,
                default_context: default_context(),
            };
            let summary = import_directory(&client, &dir, &opts).await?;
            finish(summary)
        }
    }
}
