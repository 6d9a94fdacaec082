use anyhow::{anyhow, Context, Result};
use std::{fs, path::Path, path::PathBuf};

use crate::{
    config::{default_context, resolve_registry},
    registry::{RegistryClient, SchemaRegistry, SchemaToRegister},
};

/// Schema type from the file extension; explicit `--type` wins.
fn detect_schema_type(path: &Path) -> Option<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("avsc") | Some("avro") => Some("AVRO".to_string()),
        Some("proto") => Some("PROTOBUF".to_string()),
        Some("json") => Some("JSON".to_string()),
        _ => None,
    }
}

pub async fn run(
    registry: Option<String>,
    subject: String,
    file: PathBuf,
    schema_type: Option<String>,
    context: Option<String>,
) -> Result<()> {
    let cfg = resolve_registry(registry.as_deref())?;
    let client = RegistryClient::new(&cfg)?;
    let context = context.or_else(default_context);

    let schema =
        fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;

    let schema_type = match schema_type {
        Some(t) => {
            let upper = t.to_uppercase();
            if !matches!(upper.as_str(), "AVRO" | "JSON" | "PROTOBUF") {
                return Err(anyhow!(
                    "unknown schema type '{}', choose one of: AVRO, JSON, PROTOBUF",
                    t
                ));
            }
            Some(upper)
        }
        None => detect_schema_type(&file),
    };

    let payload = SchemaToRegister {
        schema,
        schema_type,
        references: Vec::new(),
    };
    let id = client
        .register_schema(&subject, &payload, context.as_deref())
        .await
        .with_context(|| format!("registering {} under '{}'", file.display(), subject))?;

    println!("✅ registered `{}` → subject `{}` as id {}", file.display(), subject, id);
    Ok(())
}
