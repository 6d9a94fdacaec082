use anyhow::Result;
use dialoguer::Confirm;

use crate::{
    config::{default_context, resolve_registry},
    registry::RegistryClient,
};

pub async fn run(
    registry: Option<String>,
    subject: String,
    version: Option<u32>,
    permanent: bool,
    yes: bool,
    context: Option<String>,
) -> Result<()> {
    let cfg = resolve_registry(registry.as_deref())?;
    let client = RegistryClient::new(&cfg)?;
    let context = context.or_else(default_context);

    if !yes {
        let target = match version {
            Some(v) => format!("version {} of subject '{}'", v, subject),
            None => format!("subject '{}' and all its versions", subject),
        };
        let kind = if permanent { "PERMANENTLY delete" } else { "Soft-delete" };
        let confirmed = Confirm::new()
            .with_prompt(format!("{} {} on '{}'?", kind, target, cfg.name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("aborted");
            return Ok(());
        }
    }

    match version {
        Some(v) => {
            let deleted = client
                .delete_version(&subject, v, permanent, context.as_deref())
                .await?;
            println!("✅ deleted version {} of '{}'", deleted, subject);
        }
        None => {
            let deleted = client
                .delete_subject(&subject, permanent, context.as_deref())
                .await?;
            println!(
                "✅ deleted '{}' (versions: {})",
                subject,
                deleted
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    Ok(())
}
