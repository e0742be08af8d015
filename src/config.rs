//! Application-level configuration loading: where quiz data and best records live.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{DEFAULT_FLASH_DURATION, SessionOptions};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GEOQUIZ_BACK_CONFIG_PATH";
/// Environment variable that switches the catalog to a remote base URL.
const CATALOG_URL_ENV: &str = "GEOQUIZ_CATALOG_URL";
/// Directory served by the file catalog when nothing is configured.
const DEFAULT_CATALOG_ROOT: &str = "data/quizzes";
/// Record file used when nothing is configured.
const DEFAULT_RECORDS_PATH: &str = "data/records.json";

/// Where quiz feature collections are read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogSource {
    /// GeoJSON files below a directory.
    File {
        /// Catalog root directory.
        root: PathBuf,
    },
    /// GeoJSON documents under a base URL.
    Http {
        /// Base URL; `<base_url>/<quiz_id>.json` is fetched.
        base_url: String,
    },
}

/// Where best records are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordSource {
    /// JSON file on disk.
    File {
        /// Record file path.
        path: PathBuf,
    },
    /// Process memory; lost on restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Quiz data source.
    pub catalog: CatalogSource,
    /// Best-record store.
    pub records: RecordSource,
    /// Lifetime of a wrong-guess flash.
    pub flash_duration: Duration,
    /// Fixed seed for target selection.
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    ///
    /// `GEOQUIZ_CATALOG_URL`, when set, replaces the catalog with the HTTP source.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        catalog = ?app_config.catalog,
                        records = ?app_config.records,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_catalog_url(env::var(CATALOG_URL_ENV).ok())
    }

    /// Parse a JSON configuration document; absent keys take their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Point the catalog at `base_url` when it is set and non-empty.
    pub fn with_catalog_url(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            info!(%base_url, "catalog URL overridden from environment");
            self.catalog = CatalogSource::Http { base_url };
        }
        self
    }

    /// Session knobs derived from this configuration.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            flash_duration: self.flash_duration,
            rng_seed: self.rng_seed,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogSource::File {
                root: PathBuf::from(DEFAULT_CATALOG_ROOT),
            },
            records: RecordSource::File {
                path: PathBuf::from(DEFAULT_RECORDS_PATH),
            },
            flash_duration: DEFAULT_FLASH_DURATION,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    catalog: Option<CatalogSource>,
    records: Option<RecordSource>,
    flash_duration_ms: Option<u64>,
    rng_seed: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            catalog: value.catalog.unwrap_or(defaults.catalog),
            records: value.records.unwrap_or(defaults.records),
            flash_duration: value
                .flash_duration_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.flash_duration),
            rng_seed: value.rng_seed,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
