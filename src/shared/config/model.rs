use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Page-size hint sent with every fetch.
    #[serde(default = "default_fetch_size")]
    pub fetch_size: i32,
    /// Whether result sets expose the synthetic Time column.
    #[serde(default = "default_include_timestamp")]
    pub include_timestamp: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fetch_size: default_fetch_size(),
            include_timestamp: default_include_timestamp(),
        }
    }
}

fn default_fetch_size() -> i32 {
    10_000
}

fn default_include_timestamp() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("TS_DATASET_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
