//! Registry access: the `SchemaRegistry` capability trait and its
//! reqwest-backed implementation against the Confluent REST API.
//!
//! The trait covers exactly the operations the export/import engine
//! consumes, which keeps the engine testable against an in-memory fake.
//! Operations only the CLI plumbing needs (mode, deletion) live as
//! inherent methods on [`RegistryClient`].

use crate::config::{AuthConfig, RegistryConfig};
use crate::snapshot::{CompatibilityConfig, SchemaReference};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Response, StatusCode,
};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

const SCHEMA_REGISTRY_JSON: &str = "application/vnd.schemaregistry.v1+json";

/// One schema revision as the registry reports it.
#[derive(Debug, Clone)]
pub struct RegisteredSchema {
    pub subject: String,
    pub id: u32,
    pub version: u32,
    pub schema: String,
    pub schema_type: Option<String>,
    pub references: Vec<SchemaReference>,
}

/// Payload for registering a new schema version.
#[derive(Debug, Clone)]
pub struct SchemaToRegister {
    pub schema: String,
    pub schema_type: Option<String>,
    pub references: Vec<SchemaReference>,
}

/// Registry-wide or per-subject operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadWrite,
    ReadOnly,
    /// ID-preserving bulk ingestion
    Import,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::ReadWrite => "READWRITE",
            Mode::ReadOnly => "READONLY",
            Mode::Import => "IMPORT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "READWRITE" => Ok(Mode::ReadWrite),
            "READONLY" => Ok(Mode::ReadOnly),
            "IMPORT" => Ok(Mode::Import),
            other => Err(anyhow!(
                "unknown mode '{}', choose one of: READWRITE, READONLY, IMPORT",
                other
            )),
        }
    }
}

/// The registry operations the snapshot engine is built on.
///
/// `context` is an optional namespace; `None` means the registry default.
#[async_trait]
pub trait SchemaRegistry {
    async fn list_subjects(&self, context: Option<&str>) -> Result<Vec<String>>;
    async fn list_versions(&self, subject: &str, context: Option<&str>) -> Result<Vec<u32>>;
    async fn get_schema(
        &self,
        subject: &str,
        version: u32,
        context: Option<&str>,
    ) -> Result<RegisteredSchema>;
    async fn get_latest_schema(
        &self,
        subject: &str,
        context: Option<&str>,
    ) -> Result<RegisteredSchema>;
    /// Like [`get_schema`](Self::get_schema) but absence is `Ok(None)`
    /// instead of an error.
    async fn find_schema(
        &self,
        subject: &str,
        version: u32,
        context: Option<&str>,
    ) -> Result<Option<RegisteredSchema>>;
    /// Returns the id the registry assigned.
    async fn register_schema(
        &self,
        subject: &str,
        schema: &SchemaToRegister,
        context: Option<&str>,
    ) -> Result<u32>;
    async fn get_global_config(&self, context: Option<&str>)
        -> Result<Option<CompatibilityConfig>>;
    async fn set_global_config(
        &self,
        config: &CompatibilityConfig,
        context: Option<&str>,
    ) -> Result<()>;
    /// `Ok(None)` when the subject has no override and falls back to the
    /// global level.
    async fn get_subject_config(
        &self,
        subject: &str,
        context: Option<&str>,
    ) -> Result<Option<CompatibilityConfig>>;
    async fn set_subject_config(
        &self,
        subject: &str,
        config: &CompatibilityConfig,
        context: Option<&str>,
    ) -> Result<()>;
}

pub struct RegistryClient {
    pub name: String,
    pub base_url: String,
    pub client: Client,
}

/// Prefix a subject with its context the way Confluent encodes it.
fn qualify(subject: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!(":.{}:{}", ctx, subject),
        None => subject.to_string(),
    }
}

#[derive(Deserialize)]
struct VersionResponse {
    id: u32,
    version: u32,
    schema: String,
    #[serde(rename = "schemaType")]
    schema_type: Option<String>,
    #[serde(default)]
    references: Vec<WireReference>,
}

#[derive(Deserialize)]
struct WireReference {
    name: String,
    subject: String,
    version: u32,
}

#[derive(Deserialize)]
struct RegisterResponse {
    id: u32,
}

#[derive(Deserialize)]
struct ModeResponse {
    mode: String,
}

impl RegistryClient {
    pub fn new(cfg: &RegistryConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        match &cfg.auth {
            AuthConfig::None => {}
            AuthConfig::Basic {
                username,
                password_env,
            } => {
                let pw = env::var(password_env)?;
                let token = base64::encode_config(format!("{}:{}", username, pw), base64::STANDARD);
                let hv = HeaderValue::from_str(&format!("Basic {}", token))?;
                headers.insert(AUTHORIZATION, hv);
            }
            AuthConfig::Token { token_env } => {
                let tok = env::var(token_env)?;
                let hv = HeaderValue::from_str(&tok)?;
                headers.insert(AUTHORIZATION, hv);
            }
            AuthConfig::Bearer { token_env } => {
                let tok = env::var(token_env)?;
                let hv = HeaderValue::from_str(&format!("Bearer {}", tok))?;
                headers.insert(AUTHORIZATION, hv);
            }
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(RegistryClient {
            name: cfg.name.clone(),
            base_url: cfg.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Turn an error response into an anyhow error, surfacing the
    /// registry's own error_code/message body when it sends one.
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        #[derive(Deserialize)]
        struct ApiError {
            error_code: i64,
            message: String,
        }
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiError>(&body) {
            Ok(err) => bail!("registry error {}: {}", err.error_code, err.message),
            Err(_) => bail!("registry returned {}: {}", status, body.trim()),
        }
    }

    async fn fetch_version(
        &self,
        subject: &str,
        selector: &str,
        context: Option<&str>,
    ) -> Result<RegisteredSchema> {
        let url = format!(
            "{}/subjects/{}/versions/{}",
            self.base_url,
            qualify(subject, context),
            selector
        );
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        let body: VersionResponse = resp.json().await?;
        Ok(RegisteredSchema {
            subject: subject.to_string(),
            id: body.id,
            version: body.version,
            schema: body.schema,
            schema_type: body.schema_type,
            references: body
                .references
                .into_iter()
                .map(|r| SchemaReference {
                    name: r.name,
                    subject: r.subject,
                    version: r.version,
                })
                .collect(),
        })
    }

    async fn get_config_at(&self, url: &str) -> Result<Option<CompatibilityConfig>> {
        let resp = self.client.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        Ok(Some(resp.json().await?))
    }

    async fn put_config_at(&self, url: &str, config: &CompatibilityConfig) -> Result<()> {
        // PUT /config takes "compatibility" where GET reports
        // "compatibilityLevel"; the secondary flags keep their names.
        let mut body = serde_json::json!({
            "compatibility": config.compatibility_level.as_str(),
        });
        if let Some(normalize) = config.normalize {
            body["normalize"] = normalize.into();
        }
        if let Some(validate) = config.validate_fields {
            body["validateFields"] = validate.into();
        }
        let resp = self
            .client
            .put(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(SCHEMA_REGISTRY_JSON))
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn get_mode(
        &self,
        subject: Option<&str>,
        context: Option<&str>,
    ) -> Result<Mode> {
        let url = match subject {
            Some(s) => format!("{}/mode/{}", self.base_url, qualify(s, context)),
            None => format!("{}/mode", self.base_url),
        };
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        let body: ModeResponse = resp.json().await?;
        body.mode.parse()
    }

    pub async fn set_mode(
        &self,
        mode: Mode,
        subject: Option<&str>,
        context: Option<&str>,
    ) -> Result<Mode> {
        let url = match subject {
            Some(s) => format!("{}/mode/{}", self.base_url, qualify(s, context)),
            None => format!("{}/mode", self.base_url),
        };
        let resp = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static(SCHEMA_REGISTRY_JSON))
            .json(&serde_json::json!({ "mode": mode.as_str() }))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: ModeResponse = resp.json().await?;
        body.mode.parse()
    }

    /// Delete a whole subject; returns the version numbers removed.
    pub async fn delete_subject(
        &self,
        subject: &str,
        permanent: bool,
        context: Option<&str>,
    ) -> Result<Vec<u32>> {
        let url = format!(
            "{}/subjects/{}?permanent={}",
            self.base_url,
            qualify(subject, context),
            permanent
        );
        let resp = Self::check(self.client.delete(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Delete one version of a subject; returns the deleted version number.
    pub async fn delete_version(
        &self,
        subject: &str,
        version: u32,
        permanent: bool,
        context: Option<&str>,
    ) -> Result<u32> {
        let url = format!(
            "{}/subjects/{}/versions/{}?permanent={}",
            self.base_url,
            qualify(subject, context),
            version,
            permanent
        );
        let resp = Self::check(self.client.delete(&url).send().await?).await?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl SchemaRegistry for RegistryClient {
    async fn list_subjects(&self, context: Option<&str>) -> Result<Vec<String>> {
        let url = match context {
            Some(ctx) => format!("{}/subjects?subjectPrefix=:.{}:", self.base_url, ctx),
            None => format!("{}/subjects", self.base_url),
        };
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        let names: Vec<String> = resp.json().await?;
        // context-qualified names come back prefixed; callers deal in bare names
        let stripped = match context {
            Some(ctx) => {
                let prefix = format!(":.{}:", ctx);
                names
                    .into_iter()
                    .map(|n| n.strip_prefix(&prefix).map(str::to_string).unwrap_or(n))
                    .collect()
            }
            None => names,
        };
        Ok(stripped)
    }

    async fn list_versions(&self, subject: &str, context: Option<&str>) -> Result<Vec<u32>> {
        let url = format!(
            "{}/subjects/{}/versions",
            self.base_url,
            qualify(subject, context)
        );
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn get_schema(
        &self,
        subject: &str,
        version: u32,
        context: Option<&str>,
    ) -> Result<RegisteredSchema> {
        self.fetch_version(subject, &version.to_string(), context)
            .await
    }

    async fn get_latest_schema(
        &self,
        subject: &str,
        context: Option<&str>,
    ) -> Result<RegisteredSchema> {
        self.fetch_version(subject, "latest", context).await
    }

    async fn find_schema(
        &self,
        subject: &str,
        version: u32,
        context: Option<&str>,
    ) -> Result<Option<RegisteredSchema>> {
        let url = format!(
            "{}/subjects/{}/versions/{}",
            self.base_url,
            qualify(subject, context),
            version
        );
        let resp = self.client.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        let body: VersionResponse = resp.json().await?;
        Ok(Some(RegisteredSchema {
            subject: subject.to_string(),
            id: body.id,
            version: body.version,
            schema: body.schema,
            schema_type: body.schema_type,
            references: body
                .references
                .into_iter()
                .map(|r| SchemaReference {
                    name: r.name,
                    subject: r.subject,
                    version: r.version,
                })
                .collect(),
        }))
    }

    async fn register_schema(
        &self,
        subject: &str,
        schema: &SchemaToRegister,
        context: Option<&str>,
    ) -> Result<u32> {
        let url = format!(
            "{}/subjects/{}/versions",
            self.base_url,
            qualify(subject, context)
        );
        let mut body = serde_json::json!({ "schema": schema.schema });
        if let Some(schema_type) = &schema.schema_type {
            body["schemaType"] = schema_type.clone().into();
        }
        if !schema.references.is_empty() {
            body["references"] = serde_json::to_value(&schema.references)?;
        }
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static(SCHEMA_REGISTRY_JSON))
            .json(&body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: RegisterResponse = resp.json().await?;
        Ok(body.id)
    }

    async fn get_global_config(
        &self,
        context: Option<&str>,
    ) -> Result<Option<CompatibilityConfig>> {
        // a context's "global" config is addressed by the bare qualifier
        let url = match context {
            Some(ctx) => format!("{}/config/:.{}:", self.base_url, ctx),
            None => format!("{}/config", self.base_url),
        };
        self.get_config_at(&url).await
    }

    async fn set_global_config(
        &self,
        config: &CompatibilityConfig,
        context: Option<&str>,
    ) -> Result<()> {
        let url = match context {
            Some(ctx) => format!("{}/config/:.{}:", self.base_url, ctx),
            None => format!("{}/config", self.base_url),
        };
        self.put_config_at(&url, config).await
    }

    async fn get_subject_config(
        &self,
        subject: &str,
        context: Option<&str>,
    ) -> Result<Option<CompatibilityConfig>> {
        let url = format!(
            "{}/config/{}",
            self.base_url,
            qualify(subject, context)
        );
        self.get_config_at(&url).await
    }

    async fn set_subject_config(
        &self,
        subject: &str,
        config: &CompatibilityConfig,
        context: Option<&str>,
    ) -> Result<()> {
        let url = format!(
            "{}/config/{}",
            self.base_url,
            qualify(subject, context)
        );
        self.put_config_at(&url, config).await
    }
}
