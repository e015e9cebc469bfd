use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    pub dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { dir: "templates".to_string() }
    }
}

/// External scraper invocation. Without a `command` the refresh endpoint
/// only acknowledges requests.
#[derive(Debug, Deserialize, Clone)]
pub struct IngestionConfig {
    pub command: Option<Vec<String>>,
    pub log_file: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            command: None,
            log_file: Some("app.log".to_string()),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_max_connections() -> u32 { 5 }
fn default_timeout_seconds() -> u64 { 300 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked local overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `ROOMS__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("ROOMS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
