//! Plugin identity, user configuration and service wiring.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

use crate::config::TmdbConfig;
use crate::metadata::client::MetadataClient;
use crate::metadata::providers::{TmdbMovieImageProvider, TmdbSeriesImageProvider};
use crate::metadata::registry::ProviderRegistry;
use crate::metadata::tmdb::TmdbClient;

pub const PLUGIN_ID: Uuid = uuid!("d0c35097-0861-40b8-8221-58a86ba541f6");
pub const PLUGIN_NAME: &str = "TextlessImages";
pub const PLUGIN_DESCRIPTION: &str =
    "Get metadata for movies and other video content from TheMovieDb.";
pub const CONFIGURATION_FILE_NAME: &str = "Jellyfin.Plugin.TextlessImages.xml";
pub const CONFIGURATION_PAGE_PATH: &str = "/textless/ConfigurationPage";

/// User-editable options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluginConfiguration {
    /// When set, untagged posters are dropped as long as a tagged one exists.
    #[serde(rename = "ExcludeTextLessImages", default)]
    pub exclude_text_less_images: bool,
}

/// Somewhere the current [`PluginConfiguration`] can be read from.
///
/// `None` means the configuration is unavailable (plugin not loaded yet or
/// already torn down).
pub trait ConfigurationSource: Send + Sync {
    fn configuration(&self) -> Option<PluginConfiguration>;
}

impl ConfigurationSource for PluginConfiguration {
    fn configuration(&self) -> Option<PluginConfiguration> {
        Some(self.clone())
    }
}

impl ConfigurationSource for RwLock<PluginConfiguration> {
    fn configuration(&self) -> Option<PluginConfiguration> {
        Some(self.read().clone())
    }
}

impl ConfigurationSource for Weak<RwLock<PluginConfiguration>> {
    fn configuration(&self) -> Option<PluginConfiguration> {
        self.upgrade().map(|live| live.read().clone())
    }
}

/// Current value of the textless-exclusion flag, `false` when the
/// configuration cannot be read.
pub fn exclude_text_less_images(source: &dyn ConfigurationSource) -> bool {
    source
        .configuration()
        .map_or(false, |c| c.exclude_text_less_images)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginPageInfo {
    pub name: &'static str,
    pub path: &'static str,
}

/// Descriptor served at `/textless/Plugin`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginInfo {
    pub id: Uuid,
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub configuration_file_name: &'static str,
    pub pages: Vec<PluginPageInfo>,
}

impl PluginInfo {
    pub fn current() -> Self {
        Self {
            id: PLUGIN_ID,
            name: PLUGIN_NAME,
            description: PLUGIN_DESCRIPTION,
            version: env!("CARGO_PKG_VERSION"),
            configuration_file_name: CONFIGURATION_FILE_NAME,
            pages: vec![PluginPageInfo {
                name: PLUGIN_NAME,
                path: CONFIGURATION_PAGE_PATH,
            }],
        }
    }
}

/// Build the shared TMDb client and register the movie and series providers.
pub fn register_services(
    http: reqwest::Client,
    tmdb: &TmdbConfig,
    configuration: Arc<dyn ConfigurationSource>,
) -> (Arc<TmdbClient>, ProviderRegistry) {
    let client = Arc::new(TmdbClient::new(http.clone(), tmdb));
    let shared: Arc<dyn MetadataClient> = client.clone();

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(TmdbMovieImageProvider::new(
        http.clone(),
        shared.clone(),
        configuration.clone(),
    )));
    registry.register(Arc::new(TmdbSeriesImageProvider::new(
        http,
        shared,
        configuration,
    )));

    tracing::debug!(
        providers = registry.providers().len(),
        tmdb_available = client.is_available(),
        "Registered TMDb image providers"
    );

    (client, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{BaseItem, ItemKind};

    #[test]
    fn serialized_name_matches_settings_page() {
        let json = serde_json::to_value(PluginConfiguration {
            exclude_text_less_images: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "ExcludeTextLessImages": true }));

        let parsed: PluginConfiguration = serde_json::from_str("{}").unwrap();
        assert!(!parsed.exclude_text_less_images);
    }

    #[test]
    fn live_lock_reflects_updates() {
        let live = RwLock::new(PluginConfiguration::default());
        assert!(!exclude_text_less_images(&live));
        live.write().exclude_text_less_images = true;
        assert!(exclude_text_less_images(&live));
    }

    #[test]
    fn dropped_plugin_fails_open() {
        let live = Arc::new(RwLock::new(PluginConfiguration {
            exclude_text_less_images: true,
        }));
        let weak = Arc::downgrade(&live);
        assert!(exclude_text_less_images(&weak));

        drop(live);
        assert_eq!(weak.configuration(), None);
        assert!(!exclude_text_less_images(&weak));
    }

    #[test]
    fn descriptor_identity() {
        let info = PluginInfo::current();
        assert_eq!(info.id.to_string(), "d0c35097-0861-40b8-8221-58a86ba541f6");
        assert_eq!(info.name, "TextlessImages");
        assert_eq!(info.pages[0].path, "/textless/ConfigurationPage");
    }

    #[test]
    fn registers_movie_and_series_providers() {
        let (client, registry) = register_services(
            reqwest::Client::new(),
            &TmdbConfig::default(),
            Arc::new(PluginConfiguration::default()),
        );
        assert!(!client.is_available());
        assert_eq!(registry.providers().len(), 2);

        let movie = BaseItem::new(ItemKind::Movie, "m");
        let series = BaseItem::new(ItemKind::Series, "s");
        assert_eq!(registry.for_item(&movie)[0].order(), 0);
        assert_eq!(registry.for_item(&series)[0].order(), 2);
        assert!(registry
            .for_item(&BaseItem::new(ItemKind::Episode, "e"))
            .is_empty());
    }
}
