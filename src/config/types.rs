use serde::{Deserialize, Serialize};

use crate::plugin::PluginConfiguration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    /// Options edited from the settings page.
    #[serde(default)]
    pub plugin: PluginConfiguration,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Require an API key on the /textless routes
    #[serde(default)]
    pub enabled: bool,

    /// Accepted as `Authorization: Bearer`, `X-Emby-Token` or a MediaBrowser `Token=`
    /// (generate with `textless generate-api-key`)
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8096
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDb v3 API key (falls back to the TMDB_API_KEY environment variable)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Prefix for image URLs; the size segment and file path are appended
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    #[serde(default = "default_image_size")]
    pub poster_size: String,

    #[serde(default = "default_image_size")]
    pub backdrop_size: String,

    #[serde(default = "default_image_size")]
    pub logo_size: String,

    /// Timeout for every outbound request made through the shared HTTP client
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Used when a request does not name a metadata language
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/".to_string()
}
fn default_image_size() -> String {
    "original".to_string()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_language() -> String {
    crate::item::DEFAULT_METADATA_LANGUAGE.to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            poster_size: default_image_size(),
            backdrop_size: default_image_size(),
            logo_size: default_image_size(),
            request_timeout_secs: default_request_timeout(),
            default_language: default_language(),
        }
    }
}
