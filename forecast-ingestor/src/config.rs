use std::{fs, io, path::Path};

use forecast_client::db::{TableName, TableNameError};
use serde::Deserialize;

use crate::ingestor::FailurePolicy;
use crate::sources::open_meteo::OPEN_METEO_FORECAST_URL;

const CONFIG_PATH_VAR: &str = "FORECAST_INGESTOR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "forecast-ingestor.toml";
const TARGET_TABLE_VAR: &str = "target_table";
const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`target_table` is not set")]
    MissingTargetTable,
    #[error("invalid `target_table`: {0}")]
    TargetTable(#[from] TableNameError),
    #[error("table.kind = \"pgwire\" requires table.uri or DATABASE_URL")]
    MissingDatabaseUri,
    #[error("failed to set up table client: {0}")]
    TableClient(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_forecast_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            url: default_forecast_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_forecast_url() -> String {
    OPEN_METEO_FORECAST_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Pgwire,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub kind: TableKind,
    pub uri: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            kind: TableKind::default(),
            uri: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

fn default_max_connections() -> u32 {
    2
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerConfig {
    #[serde(default = "default_http_bind_addr")]
    pub http_bind_addr: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            http_bind_addr: default_http_bind_addr(),
        }
    }
}

fn default_http_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub target_table: Option<String>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub trigger: TriggerConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load the config file (if any) and apply environment overrides.
    ///
    /// A file named through `FORECAST_INGESTOR_CONFIG` must exist; the default
    /// path is optional and built-in defaults apply without it.
    pub fn load() -> Result<Self, ConfigError> {
        let (path, required) = match std::env::var(CONFIG_PATH_VAR) {
            Ok(p) => (p, true),
            Err(_) => (DEFAULT_CONFIG_PATH.to_string(), false),
        };

        let cfg = if required || Path::new(&path).exists() {
            let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            Self::from_toml_str(&contents)?
        } else {
            Self::default()
        };

        Ok(cfg.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment values win over the file.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(table) = lookup(TARGET_TABLE_VAR).filter(|v| !v.trim().is_empty()) {
            self.target_table = Some(table);
        }
        if let Some(uri) = lookup(DATABASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.table.uri = Some(uri);
        }
        self
    }

    pub fn target_table(&self) -> Result<TableName, ConfigError> {
        let raw = self
            .target_table
            .as_deref()
            .ok_or(ConfigError::MissingTargetTable)?;
        Ok(TableName::parse(raw)?)
    }
}
