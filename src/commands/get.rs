use anyhow::Result;

use crate::{
    config::{default_context, resolve_registry},
    registry::{RegistryClient, SchemaRegistry},
};

pub async fn run(
    registry: Option<String>,
    subject: String,
    version: Option<u32>,
    context: Option<String>,
) -> Result<()> {
    let cfg = resolve_registry(registry.as_deref())?;
    let client = RegistryClient::new(&cfg)?;
    let context = context.or_else(default_context);

    let schema = match version {
        Some(v) => client.get_schema(&subject, v, context.as_deref()).await?,
        None => client.get_latest_schema(&subject, context.as_deref()).await?,
    };

    // metadata on stderr so the payload itself stays pipeable
    eprintln!(
        "subject={} version={} id={} type={}",
        schema.subject,
        schema.version,
        schema.id,
        schema.schema_type.as_deref().unwrap_or("AVRO")
    );
    println!("{}", schema.schema);
    Ok(())
}
