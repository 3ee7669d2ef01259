use crate::errors::{ColloquyError, ColloquyResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, sync::RwLock};

/// Default discussion endpoint, matching the reference backend.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/chat";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub endpoint: String,
    pub log_level: String,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Loads the config file if present, otherwise writes the defaults.
/// The `COLLOQUY_ENDPOINT` environment variable overrides the endpoint
/// either way.
pub fn initialize_config() -> ColloquyResult<()> {
    let config_path = get_config_path()?;

    let mut config = if config_path.exists() {
        let config_str = fs::read_to_string(&config_path)
            .map_err(|e| ColloquyError::config_error(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&config_str)
            .map_err(|e| ColloquyError::config_error(format!("Failed to parse config: {}", e)))?
    } else {
        let config = Config::default();

        fs::create_dir_all(config_path.parent().unwrap_or(&config_path)).map_err(|e| {
            ColloquyError::config_error(format!("Failed to create config directory: {}", e))
        })?;

        let config_str = serde_json::to_string_pretty(&config)
            .map_err(|e| ColloquyError::config_error(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, config_str)
            .map_err(|e| ColloquyError::config_error(format!("Failed to write config file: {}", e)))?;

        config
    };

    if let Ok(endpoint) = env::var("COLLOQUY_ENDPOINT") {
        config.endpoint = endpoint;
    }

    validate_config(&config)?;

    *CONFIG.write().unwrap() = config;

    Ok(())
}

fn get_config_path() -> ColloquyResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ColloquyError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("colloquy").join("config.json"))
}

fn validate_config(config: &Config) -> ColloquyResult<()> {
    if config.endpoint.is_empty() {
        return Err(ColloquyError::config_error("Endpoint URL is required"));
    }

    if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
        return Err(ColloquyError::config_error(
            "Endpoint must be an http(s) URL",
        ));
    }

    if config.log_level.is_empty() {
        return Err(ColloquyError::config_error("Log level is required"));
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}
