use anyhow::Result;

use crate::{
    config::{default_context, resolve_registry},
    registry::{RegistryClient, SchemaRegistry},
};

pub async fn run(
    registry: Option<String>,
    subject: String,
    context: Option<String>,
) -> Result<()> {
    let cfg = resolve_registry(registry.as_deref())?;
    let client = RegistryClient::new(&cfg)?;
    let context = context.or_else(default_context);

    for version in client.list_versions(&subject, context.as_deref()).await? {
        println!("{version}");
    }
    Ok(())
}
