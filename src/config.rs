//! Layered configuration for ingestion, persistence and export.
//!
//! Values are resolved in order:
//! 1. Defaults in code
//! 2. An optional TOML file (`aemet.toml` unless another path is given)
//! 3. Environment variables with the `AEMET_` prefix (`AEMET_DATABASE__URL`, ...)

use crate::analyzers::AggregationMode;
use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_URL, DEFAULT_DATA_DIR, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_NORMALIZED_SUFFIX, DEFAULT_SOURCE_ENCODING, DEFAULT_SOURCE_FILES,
    DEFAULT_STATION_PREFIX_LEN,
};
use config::{Environment, File};
use encoding_rs::Encoding;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the raw exports and their UTF-8 copies
    pub data_dir: PathBuf,

    /// Export names without extension, ingested in this order
    #[validate(length(min = 1))]
    pub source_files: Vec<String>,

    /// Label understood by `encoding_rs`, must be single-byte
    pub source_encoding: String,

    /// Appended to the file stem of each UTF-8 copy
    pub normalized_suffix: String,

    /// Characters preceding `yyyyMMdd` in each file name
    #[validate(range(min = 1, max = 32))]
    pub station_prefix_len: usize,

    pub aggregation_mode: AggregationMode,

    pub database: DatabaseConfig,

    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL
    pub url: String,

    /// Create the observations table on connect
    pub init_tables: bool,

    pub max_connections: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// JSON destination; a dated name under `data/` when unset
    pub path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            source_files: DEFAULT_SOURCE_FILES.iter().map(|s| s.to_string()).collect(),
            source_encoding: DEFAULT_SOURCE_ENCODING.to_string(),
            normalized_suffix: DEFAULT_NORMALIZED_SUFFIX.to_string(),
            station_prefix_len: DEFAULT_STATION_PREFIX_LEN,
            aggregation_mode: AggregationMode::default(),
            database: DatabaseConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            init_tables: true,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        debug!("Loading configuration (file: {})", file.display());

        let settings = config::Config::builder()
            .add_source(File::from(file).required(path.is_some()))
            .add_source(
                Environment::with_prefix("AEMET")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("source_files")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Field validation plus the encoding lookup.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.encoding()?;
        Ok(())
    }

    /// Resolve `source_encoding` to a single-byte encoding.
    pub fn encoding(&self) -> Result<&'static Encoding> {
        let encoding = Encoding::for_label(self.source_encoding.as_bytes()).ok_or_else(|| {
            ProcessingError::Config(format!("Unknown encoding '{}'", self.source_encoding))
        })?;

        if !encoding.is_single_byte() {
            return Err(ProcessingError::Config(format!(
                "Encoding '{}' is not a single-byte encoding",
                encoding.name()
            )));
        }

        Ok(encoding)
    }

    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }
}
