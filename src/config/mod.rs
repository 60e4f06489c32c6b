pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when the config file has no TMDb key.
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

const DEFAULT_PATHS: [&str; 4] = [
    "./textless.toml",
    "./config.toml",
    "~/.config/textless/config.toml",
    "/etc/textless/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Locate the config file: the explicit path if given, otherwise the first
/// default location that exists
pub fn find_config_path(custom_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        return Some(path.to_path_buf());
    }

    DEFAULT_PATHS.iter().find_map(|path_str| {
        let path = PathBuf::from(shellexpand::tilde(path_str).as_ref());
        path.exists().then_some(path)
    })
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = find_config_path(custom_path) {
        return load_config(&path);
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if config.tmdb.api_key.is_empty() {
        if let Ok(key) = std::env::var(TMDB_API_KEY_ENV) {
            config.tmdb.api_key = key;
        }
    }
}

/// Replace the bind address with values given on the command line.
/// `None` keeps whatever the file (or the default) set.
pub fn apply_server_overrides(config: &mut Config, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let auth = &config.server.auth;
    if auth.enabled && auth.api_key.as_deref().map_or(true, str::is_empty) {
        anyhow::bail!("Authentication is enabled but no API key is configured");
    }

    if config.tmdb.request_timeout_secs == 0 {
        anyhow::bail!("tmdb.request_timeout_secs cannot be 0");
    }

    if config.tmdb.api_key.is_empty() {
        tracing::warn!(
            "No TMDb API key configured (set tmdb.api_key or {}); image lookups will fail",
            TMDB_API_KEY_ENV
        );
    }

    Ok(())
}
