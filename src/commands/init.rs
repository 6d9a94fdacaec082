use anyhow::Result;
use std::path::Path;

use crate::config::{save_project_config, ProjectConfig};
use crate::constants::SRCTL_CONFIG;

pub async fn run() -> Result<()> {
    let path = Path::new(SRCTL_CONFIG);
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    let cfg = ProjectConfig {
        external_registries_file: Some("${SRCTL_REGISTRIES_PATH:-}".into()),
        ..Default::default()
    };
    save_project_config(&cfg, path)?;
    println!("Created {}", path.display());
    Ok(())
}
