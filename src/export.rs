//! Snapshot builder: walks subjects on a source registry and assembles a
//! [`Snapshot`] for serialization.
//!
//! Export is all-or-nothing: any registry error while building any
//! subject aborts the whole invocation. Import is the forgiving side.

use anyhow::{Context, Result};

use crate::registry::SchemaRegistry;
use crate::snapshot::{
    ExportedSchemaVersion, ExportedSubject, Snapshot, SnapshotMetadata,
};

/// Flags shaping one export invocation.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Capture every version instead of only `latest`
    pub all_versions: bool,
    /// Capture subject-level and global compatibility configuration
    pub include_config: bool,
    /// Context to export from; `None` is the registry default
    pub context: Option<String>,
}

/// Build a snapshot of the given subjects, in the given order.
pub async fn build_snapshot(
    registry: &dyn SchemaRegistry,
    subjects: &[String],
    opts: &ExportOptions,
    metadata: SnapshotMetadata,
) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new(metadata);
    for name in subjects {
        let subject = build_subject(registry, name, opts)
            .await
            .with_context(|| format!("exporting subject '{}'", name))?;
        snapshot.subjects.push(subject);
    }
    if opts.include_config {
        snapshot.config = registry
            .get_global_config(opts.context.as_deref())
            .await
            .context("exporting global configuration")?;
    }
    Ok(snapshot)
}

/// Build the export record for one subject.
///
/// With `all_versions`, each version is fetched individually and appended
/// in the order the registry listed them; otherwise only `latest`.
pub async fn build_subject(
    registry: &dyn SchemaRegistry,
    subject: &str,
    opts: &ExportOptions,
) -> Result<ExportedSubject> {
    let context = opts.context.as_deref();

    let mut versions = Vec::new();
    if opts.all_versions {
        for number in registry.list_versions(subject, context).await? {
            let schema = registry.get_schema(subject, number, context).await?;
            versions.push(ExportedSchemaVersion {
                id: schema.id,
                version: schema.version,
                schema: schema.schema,
                schema_type: schema.schema_type,
                references: schema.references,
            });
        }
    } else {
        let schema = registry.get_latest_schema(subject, context).await?;
        versions.push(ExportedSchemaVersion {
            id: schema.id,
            version: schema.version,
            schema: schema.schema,
            schema_type: schema.schema_type,
            references: schema.references,
        });
    }

    let config = if opts.include_config {
        // absence means the subject follows the global level
        registry.get_subject_config(subject, context).await?
    } else {
        None
    };

    Ok(ExportedSubject {
        name: subject.to_string(),
        versions,
        config,
    })
}
