//! RON configuration for the recommender CLI.
//!
//! Every section is optional; a missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use recommender_core::{AggregateOptions, DocumentPolicy, Layout, DEFAULT_MAX_DOCUMENT_BYTES};
use recommender_engine::{GatewaySettings, DEFAULT_BASE_URL, DEFAULT_JOB_ROWS};
use recommender_logging::{parse_level, rec_info, rec_warn};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "recommender.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecommenderConfig {
    pub gateway: GatewayConfig,
    pub document: DocumentConfig,
    pub jobs: JobsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub job_rows: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let settings = GatewaySettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: settings.connect_timeout.as_millis() as u64,
            request_timeout_ms: settings.request_timeout.as_millis() as u64,
            job_rows: DEFAULT_JOB_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub allowed_content_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let policy = DocumentPolicy::default();
        Self {
            allowed_content_types: policy.allowed_content_types,
            max_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// How job results are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum JobLayout {
    #[default]
    Grouped,
    Flat,
}

impl From<JobLayout> for Layout {
    fn from(layout: JobLayout) -> Self {
        match layout {
            JobLayout::Grouped => Layout::Grouped,
            JobLayout::Flat => Layout::Flat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobsConfig {
    pub layout: JobLayout,
    pub source_order: Vec<String>,
    pub expected_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub destination: LogDestination,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            destination: LogDestination::Terminal,
        }
    }
}

impl LoggingConfig {
    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        parse_level(&self.level).unwrap_or(LevelFilter::Info)
    }
}

impl RecommenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                rec_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_ron(&content).map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_ron(text: &str) -> Result<Self, String> {
        let config: Self = ron::from_str(text).map_err(|err| err.to_string())?;
        if parse_level(&config.logging.level).is_none() {
            rec_warn!("Unknown log level {:?}; using info", config.logging.level);
        }
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new();
        ron::ser::to_string_pretty(self, pretty)
            .map_err(|err| ConfigError::Serialize(err.to_string()))
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.gateway.base_url.clone(),
            connect_timeout: Duration::from_millis(self.gateway.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.gateway.request_timeout_ms),
            job_rows: self.gateway.job_rows,
        }
    }

    pub fn document_policy(&self) -> DocumentPolicy {
        DocumentPolicy {
            allowed_content_types: self.document.allowed_content_types.clone(),
            max_bytes: self.document.max_bytes,
        }
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            layout: self.jobs.layout.into(),
            source_order: self.jobs.source_order.clone(),
            expected_sources: self.jobs.expected_sources.clone(),
        }
    }
}
