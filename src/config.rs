use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::matcher::{
    DEFAULT_MIN_SCORE, DEFAULT_NOTIFY_MIN_SCORE, DEFAULT_SEED_MIN_SCORE, DEFAULT_SWEEP_BATCH_SIZE,
};
use crate::core::weights::resolve_weights;
use crate::models::WeightSet;

const ENV_PREFIX: &str = "TALENTMATCH";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
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
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub default_min_score: u8,
    #[serde(default = "default_seed_min_score")]
    pub seed_min_score: u8,
    #[serde(default = "default_notify_min_score")]
    pub notify_min_score: u8,
    #[serde(default = "default_sweep_batch_size")]
    pub sweep_batch_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_min_score: default_min_score(),
            seed_min_score: default_seed_min_score(),
            notify_min_score: default_notify_min_score(),
            sweep_batch_size: default_sweep_batch_size(),
        }
    }
}

fn default_min_score() -> u8 { DEFAULT_MIN_SCORE }
fn default_seed_min_score() -> u8 { DEFAULT_SEED_MIN_SCORE }
fn default_notify_min_score() -> u8 { DEFAULT_NOTIFY_MIN_SCORE }
fn default_sweep_batch_size() -> usize { DEFAULT_SWEEP_BATCH_SIZE }

/// Scoring configuration
///
/// Weights are kept as a raw mapping on purpose: a malformed entry must not
/// fail the whole configuration, it is resolved per key to its default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: BTreeMap<String, Value>,
}

impl ScoringSettings {
    pub fn resolved_weights(&self) -> WeightSet {
        resolve_weights(&self.weights)
    }
}

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

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TALENTMATCH__)
    /// 5. DATABASE_URL, when set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TALENTMATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings = apply_database_url(settings)?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Let the conventional DATABASE_URL win over file and prefixed settings
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(raw: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    const BASE: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [database]
        url = "postgres://localhost/talentmatch"

        [cache]
        redis_url = "redis://127.0.0.1:6379"
    "#;

    #[test]
    fn test_default_matching_settings() {
        let settings = from_toml(BASE);
        assert_eq!(settings.matching.default_min_score, 50);
        assert_eq!(settings.matching.seed_min_score, 40);
        assert_eq!(settings.matching.notify_min_score, 60);
        assert_eq!(settings.matching.sweep_batch_size, 500);
        assert_eq!(settings.scoring.resolved_weights(), WeightSet::default());
    }

    #[test]
    fn test_malformed_weight_falls_back() {
        let raw = format!(
            "{}\n[scoring.weights]\nskills = 50\nexperience = \"lots\"\nlocation = 250\n",
            BASE
        );
        let weights = from_toml(&raw).scoring.resolved_weights();

        assert_eq!(weights.skills, 50.0);
        assert_eq!(weights.experience, 25.0);
        assert_eq!(weights.location, 20.0);
        assert_eq!(weights.salary, 15.0);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
