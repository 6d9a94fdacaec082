use crate::config::{load_global_config, save_global_config, AuthConfig, RegistryConfig};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use dialoguer::{Input, Select};

#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    /// List all global registries
    List,
    /// Add a new global registry (interactive prompts)
    Add,
    /// Remove a global registry by name
    Remove { name: String },
}

pub async fn run(cmd: RegistryCommands) -> Result<()> {
    let mut global = load_global_config()?;

    match cmd {
        RegistryCommands::List => {
            if global.registries.is_empty() {
                println!("(no global registries defined)");
            } else {
                for r in &global.registries {
                    println!(" - {} → {} (auth={:?})", r.name, r.url, r.auth);
                }
            }
        }
        RegistryCommands::Add => {
            let name: String = Input::new().with_prompt("Registry name").interact_text()?;
            if global.registries.iter().any(|r| r.name == name) {
                return Err(anyhow!("registry '{}' already exists", name));
            }
            let url: String = Input::new()
                .with_prompt("Registry URL")
                .default("http://localhost:8081".to_string())
                .interact_text()?;

            let auth_options = vec!["none", "basic", "token", "bearer"];
            let selection = Select::new()
                .with_prompt("Auth type")
                .items(&auth_options)
                .default(0)
                .interact()?;

            let auth = match auth_options[selection] {
                "basic" => {
                    let username: String =
                        Input::new().with_prompt("Username").interact_text()?;
                    let password_env: String = Input::new()
                        .with_prompt("Password env var")
                        .interact_text()?;
                    AuthConfig::Basic {
                        username,
                        password_env,
                    }
                }
                "token" => {
                    let token_env: String =
                        Input::new().with_prompt("Token env var").interact_text()?;
                    AuthConfig::Token { token_env }
                }
                "bearer" => {
                    let token_env: String = Input::new()
                        .with_prompt("Bearer-token env var")
                        .interact_text()?;
                    AuthConfig::Bearer { token_env }
                }
                _ => AuthConfig::None,
            };

            global.registries.push(RegistryConfig {
                name: name.clone(),
                url: url.trim_end_matches('/').to_string(),
                auth,
            });
            save_global_config(&global)?;
            println!("✅ Added registry '{name}' successfully");
        }
        RegistryCommands::Remove { name } => {
            let before = global.registries.len();
            global.registries.retain(|r| r.name != name);
            if global.registries.len() == before {
                println!("no such registry '{name}'");
            } else {
                save_global_config(&global)?;
                println!("removed '{name}'");
            }
        }
    }

    Ok(())
}
