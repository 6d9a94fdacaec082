//! Import reconciler: replays a [`Snapshot`] against a target registry.
//!
//! Every (subject, version) pair in the snapshot yields exactly one
//! [`ImportResult`], in snapshot order. A failed registration is recorded
//! and processing continues; the engine never aborts mid-snapshot. The
//! directory batch processor adds a second isolation layer on top: a file
//! that fails to parse is reported and skipped while the rest of the
//! directory is still imported.

use anyhow::{anyhow, Result};
use std::fmt;
use std::path::Path;

use crate::registry::{SchemaRegistry, SchemaToRegister};
use crate::snapshot::{discover_snapshots, ExportedSchemaVersion, ExportedSubject, Snapshot};

/// Flags shaping one import invocation.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Report what would happen without touching the target
    pub dry_run: bool,
    /// Leave versions alone that already exist on the target
    pub skip_existing: bool,
    /// Overwrite subject-level configuration the target already has
    pub force: bool,
    /// Explicit target context, overriding the snapshot's recorded context
    pub import_context: Option<String>,
    /// Ambient default context, used when neither of the above is set
    pub default_context: Option<String>,
}

/// Outcome of one (subject, version) import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Created,
    Existing,
    Error,
    Skipped,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportStatus::Created => "created",
            ImportStatus::Existing => "existing",
            ImportStatus::Error => "error",
            ImportStatus::Skipped => "skipped",
        })
    }
}

/// One import attempt, recorded once and never mutated.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub subject: String,
    pub version: u32,
    pub status: ImportStatus,
    /// Schema id on the target, when known
    pub id: Option<u32>,
    pub error: Option<String>,
}

impl ImportResult {
    fn created(subject: &str, version: u32, id: u32) -> Self {
        ImportResult {
            subject: subject.to_string(),
            version,
            status: ImportStatus::Created,
            id: Some(id),
            error: None,
        }
    }

    fn existing(subject: &str, version: u32, id: u32) -> Self {
        ImportResult {
            subject: subject.to_string(),
            version,
            status: ImportStatus::Existing,
            id: Some(id),
            error: None,
        }
    }

    fn skipped(subject: &str, version: u32) -> Self {
        ImportResult {
            subject: subject.to_string(),
            version,
            status: ImportStatus::Skipped,
            id: None,
            error: None,
        }
    }

    fn error(subject: &str, version: u32, message: String) -> Self {
        ImportResult {
            subject: subject.to_string(),
            version,
            status: ImportStatus::Error,
            id: None,
            error: Some(message),
        }
    }
}

/// Aggregate of an import run: counters plus the full result list.
///
/// The counters are maintained incrementally but must always equal a tally
/// of `results`; [`recount`](Self::recount) is the validation check.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub total: usize,
    pub created: usize,
    pub existing: usize,
    pub errors: usize,
    pub skipped: usize,
    pub results: Vec<ImportResult>,
}

impl ImportSummary {
    pub fn record(&mut self, result: ImportResult) {
        self.total += 1;
        match result.status {
            ImportStatus::Created => self.created += 1,
            ImportStatus::Existing => self.existing += 1,
            ImportStatus::Error => self.errors += 1,
            ImportStatus::Skipped => self.skipped += 1,
        }
        self.results.push(result);
    }

    /// Fold another summary into this one (directory mode).
    pub fn merge(&mut self, other: ImportSummary) {
        self.total += other.total;
        self.created += other.created;
        self.existing += other.existing;
        self.errors += other.errors;
        self.skipped += other.skipped;
        self.results.extend(other.results);
    }

    /// Recompute `(total, created, existing, errors, skipped)` from the
    /// result list.
    pub fn recount(&self) -> (usize, usize, usize, usize, usize) {
        let count = |status: ImportStatus| {
            self.results.iter().filter(|r| r.status == status).count()
        };
        (
            self.results.len(),
            count(ImportStatus::Created),
            count(ImportStatus::Existing),
            count(ImportStatus::Error),
            count(ImportStatus::Skipped),
        )
    }
}

/// Target context resolution: explicit override → context recorded in the
/// snapshot → ambient default.
fn effective_context<'a>(opts: &'a ImportOptions, snapshot: &'a Snapshot) -> Option<&'a str> {
    opts.import_context
        .as_deref()
        .or(snapshot.metadata.context.as_deref())
        .or(opts.default_context.as_deref())
}

/// Replay one snapshot against the target registry.
pub async fn import_snapshot(
    registry: &dyn SchemaRegistry,
    snapshot: &Snapshot,
    opts: &ImportOptions,
) -> Result<ImportSummary> {
    let context = effective_context(opts, snapshot);
    let mut summary = ImportSummary::default();

    // global config first, never under dry-run, never fatal
    if !opts.dry_run {
        if let Some(config) = &snapshot.config {
            if let Err(err) = registry.set_global_config(config, context).await {
                eprintln!("⚠️  could not set global configuration: {err:#}");
            }
        }
    }

    for subject in &snapshot.subjects {
        if !opts.dry_run {
            import_subject_config(registry, subject, context, opts.force).await;
        }
        for version in &subject.versions {
            let result = import_version(registry, &subject.name, version, context, opts).await;
            summary.record(result);
        }
    }

    Ok(summary)
}

/// Apply a subject-level config from the snapshot, if any. Failures are
/// warnings; they never show up in the version-level summary.
async fn import_subject_config(
    registry: &dyn SchemaRegistry,
    subject: &ExportedSubject,
    context: Option<&str>,
    force: bool,
) {
    let Some(config) = &subject.config else {
        return;
    };
    if !force {
        match registry.get_subject_config(&subject.name, context).await {
            Ok(Some(_)) => {
                eprintln!(
                    "⚠️  subject '{}' already has a compatibility config on the target; keeping it (use --force to overwrite)",
                    subject.name
                );
                return;
            }
            Ok(None) => {}
            Err(err) => {
                eprintln!(
                    "⚠️  could not read config for subject '{}': {err:#}",
                    subject.name
                );
                return;
            }
        }
    }
    if let Err(err) = registry
        .set_subject_config(&subject.name, config, context)
        .await
    {
        eprintln!(
            "⚠️  could not set config for subject '{}': {err:#}",
            subject.name
        );
    }
}

/// The per-version state machine: skipped (dry-run) → existing
/// (skip-existing hit) → created / error.
async fn import_version(
    registry: &dyn SchemaRegistry,
    subject: &str,
    version: &ExportedSchemaVersion,
    context: Option<&str>,
    opts: &ImportOptions,
) -> ImportResult {
    if opts.dry_run {
        return ImportResult::skipped(subject, version.version);
    }

    if opts.skip_existing {
        match registry.find_schema(subject, version.version, context).await {
            // the target's id wins here; no equality check against the snapshot's
            Ok(Some(existing)) => {
                return ImportResult::existing(subject, version.version, existing.id)
            }
            Ok(None) => {}
            Err(err) => {
                return ImportResult::error(
                    subject,
                    version.version,
                    format!("checking for existing version: {err:#}"),
                )
            }
        }
    }

    if let Err(err) = require_well_formed(version) {
        return ImportResult::error(subject, version.version, format!("{err:#}"));
    }

    let payload = SchemaToRegister {
        schema: version.schema.clone(),
        schema_type: version.schema_type.clone(),
        references: version.references.clone(),
    };
    match registry.register_schema(subject, &payload, context).await {
        Ok(id) => ImportResult::created(subject, version.version, id),
        Err(err) => ImportResult::error(subject, version.version, format!("{err:#}")),
    }
}

/// JSON-carried schema types must parse before we spend a network round
/// trip on them. PROTOBUF payloads are plain text and exempt; a missing
/// type tag means AVRO to Confluent-compatible registries.
fn require_well_formed(version: &ExportedSchemaVersion) -> Result<()> {
    let json_carried = matches!(
        version.schema_type.as_deref(),
        None | Some("AVRO") | Some("JSON")
    );
    if json_carried {
        serde_json::from_str::<serde_json::Value>(&version.schema)
            .map_err(|err| anyhow!("schema payload is not well-formed JSON: {err}"))?;
    }
    Ok(())
}

/// Import every snapshot file in `dir`, lexically ordered, merging the
/// per-file summaries. Unparseable files are reported and skipped.
pub async fn import_directory(
    registry: &dyn SchemaRegistry,
    dir: &Path,
    opts: &ImportOptions,
) -> Result<ImportSummary> {
    let files = discover_snapshots(dir)?;
    let mut aggregate = ImportSummary::default();
    for path in files {
        match Snapshot::load(&path) {
            Ok(snapshot) => {
                let summary = import_snapshot(registry, &snapshot, opts).await?;
                aggregate.merge(summary);
            }
            Err(err) => {
                eprintln!("⚠️  skipping {}: {err:#}", path.display());
            }
        }
    }
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotMetadata;

    fn version(schema: &str, schema_type: Option<&str>) -> ExportedSchemaVersion {
        ExportedSchemaVersion {
            id: 1,
            version: 1,
            schema: schema.to_string(),
            schema_type: schema_type.map(str::to_string),
            references: Vec::new(),
        }
    }

    #[test]
    fn counters_match_recount_after_mixed_results() {
        let mut summary = ImportSummary::default();
        summary.record(ImportResult::created("a", 1, 10));
        summary.record(ImportResult::existing("a", 2, 11));
        summary.record(ImportResult::error("b", 1, "boom".into()));
        summary.record(ImportResult::skipped("b", 2));

        assert_eq!(
            (summary.total, summary.created, summary.existing, summary.errors, summary.skipped),
            summary.recount()
        );
    }

    #[test]
    fn merge_adds_counts_and_concatenates_results() {
        let mut left = ImportSummary::default();
        left.record(ImportResult::created("a", 1, 10));
        let mut right = ImportSummary::default();
        right.record(ImportResult::error("b", 1, "boom".into()));
        right.record(ImportResult::created("b", 2, 12));

        left.merge(right);
        assert_eq!(left.total, 3);
        assert_eq!(left.created, 2);
        assert_eq!(left.errors, 1);
        assert_eq!((left.total, left.created, left.existing, left.errors, left.skipped), left.recount());
        assert_eq!(left.results[1].subject, "b");
    }

    #[test]
    fn malformed_avro_payload_is_rejected_locally() {
        assert!(require_well_formed(&version("{not json", None)).is_err());
        assert!(require_well_formed(&version("{not json", Some("AVRO"))).is_err());
        assert!(require_well_formed(&version(r#"{"type":"string"}"#, Some("JSON"))).is_ok());
    }

    #[test]
    fn protobuf_payload_is_exempt_from_json_check() {
        let proto = "syntax = \"proto3\"; message Ping {}";
        assert!(require_well_formed(&version(proto, Some("PROTOBUF"))).is_ok());
    }

    #[test]
    fn context_resolution_prefers_override_then_snapshot_then_default() {
        let mut snapshot = Snapshot::new(SnapshotMetadata {
            exported_at: "2024-06-01T12:00:00+00:00".into(),
            context: Some("from-snapshot".into()),
            registry_url: None,
            cli_version: "0.1.0".into(),
        });

        let mut opts = ImportOptions {
            import_context: Some("explicit".into()),
            default_context: Some("ambient".into()),
            ..Default::default()
        };
        assert_eq!(effective_context(&opts, &snapshot), Some("explicit"));

        opts.import_context = None;
        assert_eq!(effective_context(&opts, &snapshot), Some("from-snapshot"));

        snapshot.metadata.context = None;
        assert_eq!(effective_context(&opts, &snapshot), Some("ambient"));

        opts.default_context = None;
        assert_eq!(effective_context(&opts, &snapshot), None);
    }
}
