//! Configuration management for srctl
//!
//! Two layers of configuration are merged at load time:
//! - Project configuration (`srctlconfig.yaml`) in the working directory
//! - Global registries file in `~/.config/srctl/registries.yaml` or the
//!   path named by `SRCTL_REGISTRIES_PATH`
//!
//! Project-level registry definitions override global ones with the same
//! name. Configuration files support environment variable expansion with
//! `${VAR}` and `${VAR:-default}` syntax, so tokens and per-environment
//! URLs never have to be committed.

use anyhow::{anyhow, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs, path::PathBuf};

use crate::constants::{DEFAULT_REGISTRY_URL, SRCTL_CONFIG};

/// Project configuration loaded from `srctlconfig.yaml`
///
/// # Example
///
/// ```yaml
/// externalRegistriesFile: ${SRCTL_REGISTRIES_PATH:-}
/// registries:
///   - name: production
///     url: https://schema-registry.example.com
///     auth:
///       type: basic
///       username: svc-schemas
///       passwordEnv: SR_PASSWORD
/// defaults:
///   registry: production
///   context: payments
/// ```
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Optional path to an extra registries file merged below project entries
    pub external_registries_file: Option<String>,
    /// Registry definitions specific to this project
    #[serde(default)]
    pub registries: Vec<RegistryConfig>,
    /// Fallbacks applied when a command omits `--registry` / `--context`
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Default registry and context applied when flags are omitted
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsConfig {
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// Connection details and authentication for one schema registry
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Unique name, referenced by `--registry` and `defaults.registry`
    pub name: String,
    /// Base URL of the registry REST API
    pub url: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Authentication configuration for registry access
///
/// Credentials are always sourced from environment variables so they never
/// land in a config file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "type")]
pub enum AuthConfig {
    /// Anonymous access
    #[default]
    None,
    /// HTTP Basic authentication
    Basic {
        username: String,
        /// Environment variable holding the password
        password_env: String,
    },
    /// Raw token placed in the Authorization header
    Token { token_env: String },
    /// Bearer token authentication
    Bearer { token_env: String },
}

/// Global registries file shared between projects
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    #[serde(default)]
    pub registries: Vec<RegistryConfig>,
}

impl ProjectConfig {
    /// Merge global, external, and project registries (later wins):
    /// 1. Global registries file
    /// 2. External file named by `externalRegistriesFile`
    /// 3. Project-local entries
    pub fn merge_registries(&self, global: GlobalConfig) -> anyhow::Result<Vec<RegistryConfig>> {
        let mut map = std::collections::HashMap::new();
        for reg in global.registries {
            map.insert(reg.name.clone(), reg);
        }
        if let Some(path) = &self.external_registries_file {
            if !path.is_empty() {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("reading external registries from {path}"))?;
                let ext: GlobalConfig = serde_yaml::from_str(&contents)?;
                for reg in ext.registries {
                    map.insert(reg.name.clone(), reg);
                }
            }
        }
        for reg in &self.registries {
            map.insert(reg.name.clone(), reg.clone());
        }
        Ok(map.into_values().collect())
    }
}

/// Pick the registry a command should talk to.
///
/// Resolution order: explicit `--registry` flag → `defaults.registry` from
/// the project config → the sole configured registry if there is exactly
/// one → an unauthenticated localhost fallback when nothing is configured.
pub fn resolve_registry(explicit: Option<&str>) -> anyhow::Result<RegistryConfig> {
    let project = load_project_config_or_default()?;
    let global = load_global_config()?;
    let merged = project.merge_registries(global)?;

    let wanted = explicit
        .map(str::to_string)
        .or_else(|| project.defaults.registry.clone());

    match wanted {
        Some(name) => merged
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| anyhow!("no registry named '{}' is configured", name)),
        None if merged.len() == 1 => Ok(merged.into_iter().next().unwrap()),
        None if merged.is_empty() => Ok(RegistryConfig {
            name: "local".to_string(),
            url: DEFAULT_REGISTRY_URL.to_string(),
            auth: AuthConfig::None,
        }),
        None => Err(anyhow!(
            "multiple registries configured; pass --registry or set defaults.registry in {}",
            SRCTL_CONFIG
        )),
    }
}

/// Default context for commands that omit `--context`.
pub fn default_context() -> Option<String> {
    load_project_config_or_default()
        .ok()
        .and_then(|cfg| cfg.defaults.context)
}

pub fn load_project_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let expanded = preprocess_config(path)?;
    let cfg: ProjectConfig =
        serde_yaml::from_str(&expanded).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

/// Like [`load_project_config`] but a missing file yields the defaults,
/// so every command works outside an initialized project.
pub fn load_project_config_or_default() -> anyhow::Result<ProjectConfig> {
    let path = PathBuf::from(SRCTL_CONFIG);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    load_project_config(&path)
}

pub fn save_project_config(cfg: &ProjectConfig, path: &Path) -> anyhow::Result<()> {
    let data = serde_yaml::to_string(cfg)?;
    fs::write(path, data)?;
    Ok(())
}

fn global_registries_path() -> PathBuf {
    env::var("SRCTL_REGISTRIES_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("srctl/registries.yaml");
            p
        })
}

pub fn load_global_config() -> anyhow::Result<GlobalConfig> {
    let path = global_registries_path();
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    let data = fs::read_to_string(&path)
        .with_context(|| format!("reading global registries {}", path.display()))?;
    let cfg: GlobalConfig = serde_yaml::from_str(&expand_env_placeholders(&data))?;
    Ok(cfg)
}

pub fn save_global_config(cfg: &GlobalConfig) -> anyhow::Result<()> {
    let path = global_registries_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_yaml::to_string(cfg)?;
    fs::write(&path, data)?;
    println!("Saved global registries to {}", path.display());
    Ok(())
}

/// Expand `${VAR}` and `${VAR:-default}` placeholders against the process
/// environment. Unset variables without a default expand to the empty
/// string, matching shell semantics closely enough for config files.
pub fn expand_env_placeholders(input: &str) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let value = env::var(&caps[1]).ok().filter(|v| !v.is_empty());
        match (value, caps.get(2)) {
            (Some(v), _) => v,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => String::new(),
        }
    })
    .to_string()
}

pub fn preprocess_config(path: &Path) -> anyhow::Result<String> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(expand_env_placeholders(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_set_variable() {
        env::set_var("SRCTL_TEST_URL", "https://sr.internal");
        assert_eq!(
            expand_env_placeholders("url: ${SRCTL_TEST_URL}"),
            "url: https://sr.internal"
        );
    }

    #[test]
    fn expands_default_when_unset() {
        env::remove_var("SRCTL_TEST_MISSING");
        assert_eq!(
            expand_env_placeholders("url: ${SRCTL_TEST_MISSING:-http://localhost:8081}"),
            "url: http://localhost:8081"
        );
        assert_eq!(
            expand_env_placeholders("url: ${SRCTL_TEST_MISSING}"),
            "url: "
        );
    }

    #[test]
    fn project_registries_override_global() {
        let project = ProjectConfig {
            registries: vec![RegistryConfig {
                name: "prod".into(),
                url: "https://project.example.com".into(),
                auth: AuthConfig::None,
            }],
            ..Default::default()
        };
        let global = GlobalConfig {
            registries: vec![RegistryConfig {
                name: "prod".into(),
                url: "https://global.example.com".into(),
                auth: AuthConfig::None,
            }],
        };
        let merged = project.merge_registries(global).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].url, "https://project.example.com");
    }
}
