use srctl::snapshot::{
    discover_snapshots, ExportedSchemaVersion, ExportedSubject, Snapshot, SnapshotMetadata,
};
use std::fs;
use tempfile::TempDir;

fn snapshot_with_subject(name: &str, payloads: &[&str]) -> Snapshot {
    let mut snapshot = Snapshot::new(SnapshotMetadata {
        exported_at: "2024-06-01T12:00:00+00:00".to_string(),
        context: None,
        registry_url: Some("http://localhost:8081".to_string()),
        cli_version: "0.1.0".to_string(),
    });
    snapshot.subjects.push(ExportedSubject {
        name: name.to_string(),
        versions: payloads
            .iter()
            .enumerate()
            .map(|(i, schema)| ExportedSchemaVersion {
                id: 100 + i as u32,
                version: i as u32 + 1,
                schema: schema.to_string(),
                schema_type: Some("AVRO".to_string()),
                references: Vec::new(),
            })
            .collect(),
        config: None,
    });
    snapshot
}

#[test]
fn file_round_trip_preserves_subject_and_payload_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders-value.json");

    let payload = r#"{"type":"record","name":"Order","fields":[{"name":"id","type":"long"}]}"#;
    let original = snapshot_with_subject("orders-value", &[payload, r#""string""#]);
    original.save(&path).unwrap();

    let loaded = Snapshot::load(&path).unwrap();
    assert_eq!(loaded.subjects.len(), 1);
    assert_eq!(loaded.subjects[0].name, "orders-value");
    assert_eq!(loaded.version_count(), original.version_count());
    for (a, b) in loaded.subjects[0]
        .versions
        .iter()
        .zip(&original.subjects[0].versions)
    {
        assert_eq!(a.schema.as_bytes(), b.schema.as_bytes());
    }
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/a.json");
    snapshot_with_subject("a", &["{}"]).save(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn discovery_is_lexical_and_ignores_non_snapshot_files() {
    let dir = TempDir::new().unwrap();
    for name in ["b-subject.json", "a-subject.json", "README.md", "notes.txt"] {
        fs::write(dir.path().join(name), "{}").unwrap();
    }
    fs::create_dir(dir.path().join("sub.json")).unwrap();

    let found = discover_snapshots(dir.path()).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a-subject.json", "b-subject.json"]);
}

#[test]
fn loading_a_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ this is not a snapshot").unwrap();
    assert!(Snapshot::load(&path).is_err());
}
