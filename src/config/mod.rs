mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads `config.yaml` (or `CONFIG_PATH`), applies environment overrides and validates.
///
/// A missing file is only tolerated at the default path; an explicit
/// `CONFIG_PATH` that does not exist is an error.
pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    debug!("Loading configuration from: {}", config_path);

    let mut config = match load_from_path(&config_path).await {
        Ok(config) => config,
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound && explicit_path.is_none() => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
        Err(e) => return Err(e),
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Parses a YAML configuration file without applying overrides.
pub async fn load_from_path(path: &str) -> Result<Config> {
    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;
    Ok(config)
}

/// Overlays process environment values onto a parsed config.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("GEMINI_API_KEY") {
        config.gemini.api_key = key;
    }
    if let Some(url) = lookup("GEMINI_BASE_URL") {
        config.gemini.base_url = url;
    }
    if let Some(model) = lookup("GEMINI_MODEL") {
        config.gemini.model = model;
    }
    if let Some(environment) = lookup("ENVIRONMENT") {
        config.server.environment = environment;
    }
    if let Some(debug) = lookup("DEBUG") {
        config.server.debug = debug.eq_ignore_ascii_case("true");
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = parse_number("PORT", &port)?;
    }
    if let Some(origins) = lookup("ALLOWED_ORIGINS") {
        config.server.allowed_origins = origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
    }
    if let Some(requests) = lookup("RATE_LIMIT_REQUESTS") {
        config.server.rate_limit.requests = parse_number("RATE_LIMIT_REQUESTS", &requests)?;
    }
    if let Some(window) = lookup("RATE_LIMIT_WINDOW") {
        config.server.rate_limit.window_secs = parse_number("RATE_LIMIT_WINDOW", &window)?;
    }
    if let Some(account) = lookup("IDENTITY_SERVICE_ACCOUNT") {
        config.identity.service_account = Some(account);
    }

    Ok(())
}

/// Rejects configurations that cannot serve requests.
pub fn validate(config: &Config) -> Result<()> {
    if config.gemini.api_key.trim().is_empty() && !config.is_development() {
        return Err(Error::config(format!(
            "GEMINI_API_KEY must be set when ENVIRONMENT is '{}'",
            config.server.environment
        )));
    }
    if config.gemini.max_attempts == 0 {
        return Err(Error::config("gemini.max_attempts must be at least 1"));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{} must be a number, got '{}'", key, value)))
}
