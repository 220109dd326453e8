use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::types::server_config::{AppConfig, ConfigError};

/// Upper bound on `auth.session_expiry_days` (100 years).
pub const MAX_SESSION_EXPIRY_DAYS: u64 = 36_500;

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path.display());

    parse_config(&contents)
}

/// Parse and validate a TOML document. Split out of `load_config` so callers
/// holding the text already (tests, embedded defaults) skip the filesystem.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.database.url.trim().is_empty() {
        return Err(ConfigError::InvalidConfig("database.url cannot be empty".into()));
    }

    if config.database.max_connections == 0 {
        return Err(ConfigError::InvalidConfig(
            "database.max_connections must be greater than 0".into(),
        ));
    }

    if config.auth.session_expiry_days == 0 {
        return Err(ConfigError::InvalidConfig(
            "session_expiry_days must be greater than 0".into(),
        ));
    }

    if config.auth.session_expiry_days > MAX_SESSION_EXPIRY_DAYS {
        return Err(ConfigError::InvalidConfig(format!(
            "session_expiry_days must be at most {}",
            MAX_SESSION_EXPIRY_DAYS
        )));
    }

    // The name lands verbatim in Set-Cookie, so reject anything that would
    // break the header.
    let name = &config.auth.session_cookie_name;
    if name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '=' | ';' | ','))
    {
        return Err(ConfigError::InvalidConfig(format!(
            "session_cookie_name {:?} is not a valid cookie name",
            name
        )));
    }

    if config.server.max_connections == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_connections must be greater than 0".into(),
        ));
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "request_timeout_secs must be greater than 0".into(),
        ));
    }

    Ok(())
}
