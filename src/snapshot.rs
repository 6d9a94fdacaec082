//! Snapshot data model and on-disk format
//!
//! A snapshot is the portable capture of a slice of registry state:
//! metadata about the export, an ordered list of subjects with their schema
//! versions, and optionally the compatibility configuration in effect. The
//! serialized form is pretty-printed JSON so snapshots diff cleanly in
//! version control.
//!
//! Field names in the JSON output are a stable contract; renaming them
//! breaks previously exported files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::{fs, path::Path, path::PathBuf};

use crate::constants::SNAPSHOT_EXTENSION;

/// Provenance attached once per snapshot at export time.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SnapshotMetadata {
    /// RFC 3339 timestamp of the export
    pub exported_at: String,
    /// Context the subjects were exported from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Base URL of the source registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    /// Version of the tool that produced the file
    pub cli_version: String,
}

impl SnapshotMetadata {
    pub fn capture(context: Option<String>, registry_url: Option<String>) -> Self {
        SnapshotMetadata {
            exported_at: chrono::Utc::now().to_rfc3339(),
            context,
            registry_url,
            cli_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Portable capture of registry state: subjects, versions, configuration.
///
/// The snapshot is a passive container. Subject names are unique because
/// the source registry enforces that; nothing here deduplicates.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub subjects: Vec<ExportedSubject>,
    /// Global compatibility configuration, when exported with config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<CompatibilityConfig>,
}

/// One subject and its exported versions, ascending by convention.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExportedSubject {
    pub name: String,
    pub versions: Vec<ExportedSchemaVersion>,
    /// Subject-level compatibility override, when one was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<CompatibilityConfig>,
}

/// A single registered schema revision.
///
/// The schema payload is carried as an opaque string; the recorded id is
/// advisory unless the target registry runs in IMPORT mode.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExportedSchemaVersion {
    pub id: u32,
    pub version: u32,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SchemaReference>,
}

/// Named reference from one schema to a version of another subject.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SchemaReference {
    pub name: String,
    pub subject: String,
    pub version: u32,
}

/// Compatibility rule classes a registry can enforce per subject.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityLevel {
    None,
    Backward,
    BackwardTransitive,
    Forward,
    ForwardTransitive,
    Full,
    FullTransitive,
}

impl CompatibilityLevel {
    pub const ALL: [CompatibilityLevel; 7] = [
        CompatibilityLevel::None,
        CompatibilityLevel::Backward,
        CompatibilityLevel::BackwardTransitive,
        CompatibilityLevel::Forward,
        CompatibilityLevel::ForwardTransitive,
        CompatibilityLevel::Full,
        CompatibilityLevel::FullTransitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompatibilityLevel::None => "NONE",
            CompatibilityLevel::Backward => "BACKWARD",
            CompatibilityLevel::BackwardTransitive => "BACKWARD_TRANSITIVE",
            CompatibilityLevel::Forward => "FORWARD",
            CompatibilityLevel::ForwardTransitive => "FORWARD_TRANSITIVE",
            CompatibilityLevel::Full => "FULL",
            CompatibilityLevel::FullTransitive => "FULL_TRANSITIVE",
        }
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompatibilityLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_uppercase();
        CompatibilityLevel::ALL
            .into_iter()
            .find(|l| l.as_str() == upper)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown compatibility level '{}', choose one of: {}",
                    s,
                    CompatibilityLevel::ALL.map(|l| l.as_str()).join(", ")
                )
            })
    }
}

/// Compatibility configuration as the registry reports it.
///
/// Copied verbatim between registries; srctl never interprets the
/// secondary flags.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityConfig {
    pub compatibility_level: CompatibilityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_to_global: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_fields: Option<bool>,
}

impl CompatibilityConfig {
    pub fn with_level(level: CompatibilityLevel) -> Self {
        CompatibilityConfig {
            compatibility_level: level,
            normalize: None,
            default_to_global: None,
            validate_fields: None,
        }
    }
}

impl Snapshot {
    pub fn new(metadata: SnapshotMetadata) -> Self {
        Snapshot {
            metadata,
            subjects: Vec::new(),
            config: None,
        }
    }

    /// Total number of schema versions across all subjects.
    pub fn version_count(&self) -> usize {
        self.subjects.iter().map(|s| s.versions.len()).sum()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&data)
            .with_context(|| format!("parsing snapshot {}", path.display()))?;
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        fs::write(path, self.to_json()?)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        Ok(())
    }

    pub fn write_to(&self, mut out: impl Write) -> Result<()> {
        out.write_all(self.to_json()?.as_bytes())?;
        Ok(())
    }

    fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Find every snapshot file in `dir`, in lexical order.
///
/// Non-`.json` entries and subdirectories are ignored rather than
/// reported; snapshot directories commonly hold READMEs and the like.
pub fn discover_snapshots(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SNAPSHOT_EXTENSION))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new(SnapshotMetadata {
            exported_at: "2024-06-01T12:00:00+00:00".to_string(),
            context: Some("payments".to_string()),
            registry_url: Some("http://localhost:8081".to_string()),
            cli_version: "0.1.0".to_string(),
        });
        snapshot.subjects.push(ExportedSubject {
            name: "orders-value".to_string(),
            versions: vec![ExportedSchemaVersion {
                id: 101,
                version: 1,
                schema: r#"{"type":"record","name":"Order","fields":[]}"#.to_string(),
                schema_type: Some("AVRO".to_string()),
                references: vec![SchemaReference {
                    name: "common".to_string(),
                    subject: "common-value".to_string(),
                    version: 2,
                }],
            }],
            config: None,
        });
        snapshot
    }

    #[test]
    fn serialized_field_names_are_stable() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        assert!(json["metadata"]["exported_at"].is_string());
        assert!(json["metadata"]["cli_version"].is_string());
        assert_eq!(json["subjects"][0]["name"], "orders-value");
        assert_eq!(json["subjects"][0]["versions"][0]["id"], 101);
        assert_eq!(json["subjects"][0]["versions"][0]["schema_type"], "AVRO");
        assert_eq!(
            json["subjects"][0]["versions"][0]["references"][0]["subject"],
            "common-value"
        );
    }

    #[test]
    fn optional_fields_are_omitted() {
        let mut snapshot = sample_snapshot();
        snapshot.metadata.context = None;
        snapshot.metadata.registry_url = None;
        snapshot.subjects[0].versions[0].schema_type = None;
        snapshot.subjects[0].versions[0].references.clear();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["metadata"].get("context").is_none());
        assert!(json["metadata"].get("registry_url").is_none());
        assert!(json["subjects"][0]["versions"][0].get("schema_type").is_none());
        assert!(json["subjects"][0]["versions"][0].get("references").is_none());
        assert!(json.get("config").is_none());
    }

    #[test]
    fn json_round_trip_preserves_payload() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.subjects[0].name, snapshot.subjects[0].name);
        assert_eq!(parsed.version_count(), 1);
        assert_eq!(
            parsed.subjects[0].versions[0].schema,
            snapshot.subjects[0].versions[0].schema
        );
    }

    #[test]
    fn compatibility_level_parses_case_insensitively() {
        assert_eq!(
            "backward_transitive"
                .parse::<CompatibilityLevel>()
                .unwrap(),
            CompatibilityLevel::BackwardTransitive
        );
        assert!("sideways".parse::<CompatibilityLevel>().is_err());
    }

    #[test]
    fn compatibility_config_uses_registry_wire_names() {
        let config = CompatibilityConfig {
            compatibility_level: CompatibilityLevel::FullTransitive,
            normalize: Some(true),
            default_to_global: None,
            validate_fields: None,
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["compatibilityLevel"], "FULL_TRANSITIVE");
        assert_eq!(json["normalize"], true);
        assert!(json.get("defaultToGlobal").is_none());
    }
}
