use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{Coordinate, MapView, MatchPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub firestore: FirestoreSettings,
    #[serde(default)]
    pub roster: RosterSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreSettings {
    #[serde(default = "default_firestore_url")]
    pub base_url: String,
    pub project_id: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    pub api_key: Option<String>,
    #[serde(default = "default_disasters_collection")]
    pub disasters_collection: String,
    #[serde(default = "default_ngos_collection")]
    pub ngos_collection: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_firestore_url() -> String { "https://firestore.googleapis.com/v1".to_string() }
fn default_database_id() -> String { "(default)".to_string() }
fn default_disasters_collection() -> String { "disasters".to_string() }
fn default_ngos_collection() -> String { "ngos".to_string() }
fn default_page_size() -> u32 { 300 }
fn default_timeout_secs() -> u64 { 30 }

/// Where the NGO roster comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RosterSource {
    /// Dataset compiled into the binary
    #[default]
    Embedded,
    /// TOML dataset at `roster.path`
    File,
    /// Firestore `ngos` collection (safe zones still come from the embedded dataset)
    Firestore,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RosterSettings {
    #[serde(default)]
    pub source: RosterSource,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: default_cache_ttl() }
    }
}

fn default_cache_ttl() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_moderate_radius")]
    pub moderate_radius_km: f64,
    #[serde(default = "default_radius")]
    pub default_radius_km: f64,
    #[serde(default)]
    pub dedupe: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            moderate_radius_km: default_moderate_radius(),
            default_radius_km: default_radius(),
            dedupe: false,
        }
    }
}

impl From<&MatchingSettings> for MatchPolicy {
    fn from(settings: &MatchingSettings) -> Self {
        MatchPolicy {
            moderate_radius_km: settings.moderate_radius_km,
            default_radius_km: settings.default_radius_km,
            dedupe: settings.dedupe,
        }
    }
}

fn default_moderate_radius() -> f64 { 50.0 }
fn default_radius() -> f64 { 150.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            zoom: default_zoom(),
        }
    }
}

impl From<&MapSettings> for MapView {
    fn from(settings: &MapSettings) -> Self {
        MapView {
            center: Coordinate::new(settings.center_lat, settings.center_lon),
            zoom: settings.zoom,
        }
    }
}

fn default_center_lat() -> f64 { 20.5937 }
fn default_center_lon() -> f64 { 78.9629 }
fn default_zoom() -> u8 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// Apply `LOG_LEVEL` and `LOG_FORMAT` from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.overridden_by(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_FORMAT").ok())
    }

    fn overridden_by(self, level: Option<String>, format: Option<String>) -> Self {
        Self {
            level: level.filter(|v| !v.is_empty()).unwrap_or(self.level),
            format: format.filter(|v| !v.is_empty()).unwrap_or(self.format),
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RELIEF__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RELIEF__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RELIEF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RELIEF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional Firestore variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    apply_firestore_overrides(
        settings,
        env::var("FIRESTORE_PROJECT_ID").ok(),
        env::var("FIRESTORE_API_KEY").ok(),
    )
}

/// Empty values leave the layered setting untouched
fn apply_firestore_overrides(
    settings: Config,
    project_id: Option<String>,
    api_key: Option<String>,
) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Some(project_id) = project_id.filter(|v| !v.is_empty()) {
        builder = builder.set_override("firestore.project_id", project_id)?;
    }
    if let Some(api_key) = api_key.filter(|v| !v.is_empty()) {
        builder = builder.set_override("firestore.api_key", api_key)?;
    }

    builder.build()
}
