mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_from(&config_path).await?;

    if let Ok(port) = env::var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }

    Ok(config)
}

/// Reads a configuration file. A missing file yields the defaults.
pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();

    debug!("Loading configuration from: {}", config_path.display());

    match tokio::fs::read_to_string(config_path).await {
        Ok(config_str) => from_str(&config_str),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(
                "No configuration file at {}, using defaults",
                config_path.display()
            );
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn from_str(config_str: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to an all-defaults map.
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}
