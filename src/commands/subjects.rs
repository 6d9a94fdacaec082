use anyhow::Result;

use crate::{
    config::{default_context, resolve_registry},
    registry::{RegistryClient, SchemaRegistry},
};

pub async fn run(registry: Option<String>, context: Option<String>) -> Result<()> {
    let cfg = resolve_registry(registry.as_deref())?;
    let client = RegistryClient::new(&cfg)?;
    let context = context.or_else(default_context);

    let subjects = client.list_subjects(context.as_deref()).await?;
    if subjects.is_empty() {
        println!("(no subjects)");
    } else {
        for subject in subjects {
            println!("{subject}");
        }
    }
    Ok(())
}
