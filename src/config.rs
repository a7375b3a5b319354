//! Demo configuration: YAML resource names plus environment credentials.
//!
//! Resource names (catalog, schema, volume, table, endpoint, index) live in a
//! YAML file so the same binary can target different workspaces; values may
//! reference `{{catalog}}` and `{{schema}}` and are rendered before use.
//! Workspace credentials are deliberately kept out of the file and read from
//! the environment instead.

use std::env;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::processing::{DEFAULT_MAX_CHARS, DEFAULT_OVERLAP};

/// Errors encountered while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read from disk.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Path that failed to open.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// Config file was not valid YAML or did not match the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// A field needed for templating was absent.
    #[error("missing config field: {0}")]
    MissingField(&'static str),
    /// Required environment variable was not provided.
    #[error("missing environment variable: {0}")]
    MissingVariable(String),
}

/// Resource names and chunking parameters for one demo deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Catalog holding the demo schema.
    pub catalog: String,
    /// Schema holding the chunk table and volume.
    pub schema: String,
    /// Managed volume the PDFs are staged into.
    pub volume: String,
    /// Fully qualified chunk table the index syncs from.
    pub source_table: String,
    /// Vector search endpoint name.
    pub vector_search_endpoint: String,
    /// Fully qualified vector search index name.
    pub vector_search_index: String,
    /// Serving endpoint of the chat model used by the demo app.
    pub chat_model_endpoint: String,
    /// Serving endpoint computing embeddings for the index.
    pub embedding_model_endpoint: String,
    /// Language tag stamped on every chunk record.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Optional override for the chunk window size in characters.
    #[serde(default)]
    pub chunk_max_chars: Option<usize>,
    /// Optional override for the chunk overlap in characters.
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
}

fn default_lang() -> String {
    "pt-BR".to_string()
}

impl DemoConfig {
    /// Volume location as seen by the platform (`dbfs:` URI).
    pub fn volume_uri(&self) -> String {
        format!(
            "dbfs:/Volumes/{}/{}/{}",
            self.catalog, self.schema, self.volume
        )
    }

    /// Volume location as seen through the local filesystem mount.
    pub fn volume_local_path(&self) -> String {
        format!(
            "/dbfs/Volumes/{}/{}/{}",
            self.catalog, self.schema, self.volume
        )
    }

    /// Effective chunk window size.
    pub fn max_chars(&self) -> usize {
        self.chunk_max_chars.unwrap_or(DEFAULT_MAX_CHARS)
    }

    /// Effective chunk overlap.
    pub fn overlap(&self) -> usize {
        self.chunk_overlap.unwrap_or(DEFAULT_OVERLAP)
    }
}

/// Load and render the demo config from a YAML file.
///
/// Rendering replaces `{{catalog}}` and `{{schema}}` in every string value
/// with the file's own top-level `catalog`/`schema` values, so derived names
/// like `source_table: "{{catalog}}.{{schema}}.contracts_chunks"` stay in one
/// place.
pub fn load_config(path: &Path) -> Result<DemoConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let mut value: serde_yaml::Value = serde_yaml::from_str(&raw)?;

    let catalog = lookup_str(&value, "catalog")?;
    let schema = lookup_str(&value, "schema")?;
    if let serde_yaml::Value::Mapping(mapping) = &mut value {
        for entry in mapping.values_mut() {
            if let serde_yaml::Value::String(text) = entry {
                *text = text
                    .replace("{{catalog}}", &catalog)
                    .replace("{{schema}}", &schema);
            }
        }
    }

    Ok(serde_yaml::from_value(value)?)
}

fn lookup_str(value: &serde_yaml::Value, key: &'static str) -> Result<String, ConfigError> {
    value
        .get(key)
        .and_then(serde_yaml::Value::as_str)
        .map(str::to_string)
        .ok_or(ConfigError::MissingField(key))
}

/// Credentials for the workspace REST API, loaded from the environment.
#[derive(Debug, Clone)]
pub struct WorkspaceAuth {
    /// Base URL of the workspace, e.g. `https://acme.cloud.example.com`.
    pub url: String,
    /// Bearer token presented on every request.
    pub token: String,
}

impl WorkspaceAuth {
    /// Read `WORKSPACE_URL` and `WORKSPACE_TOKEN`, honoring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(Self {
            url: load_env("WORKSPACE_URL")?,
            token: load_env("WORKSPACE_TOKEN")?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}
