//! Configuration persistence using toml_edit to preserve formatting and comments.

use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::DocumentMut;

use crate::plugin::PluginConfiguration;

/// Save the entire config to a TOML file, replacing whatever was there
pub fn save_config(path: &Path, config: &super::Config) -> Result<()> {
    let new_content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;

    std::fs::write(path, new_content)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

/// Update just the `[plugin]` table of the config file.
///
/// Other tables and comments are kept as they are. A missing file is created
/// holding only the plugin table.
pub fn update_plugin(path: &Path, plugin: &PluginConfiguration) -> Result<()> {
    let mut doc: DocumentMut = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?
            .parse()
            .with_context(|| format!("Failed to parse config file: {:?}", path))?
    } else {
        DocumentMut::new()
    };

    let plugin_toml = toml::to_string(&PluginWrapper {
        plugin: plugin.clone(),
    })
    .with_context(|| "Failed to serialize plugin configuration")?;
    let plugin_doc: DocumentMut = plugin_toml
        .parse()
        .with_context(|| "Failed to parse serialized plugin configuration")?;

    match plugin_doc.get("plugin") {
        Some(item) => doc["plugin"] = item.clone(),
        None => {
            doc.remove("plugin");
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

#[derive(serde::Serialize)]
struct PluginWrapper {
    plugin: PluginConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, Config};

    #[test]
    fn update_keeps_other_tables_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textless.toml");
        std::fs::write(
            &path,
            "# my server\n[server]\nport = 9000\n\n[plugin]\nExcludeTextLessImages = false\n",
        )
        .unwrap();

        update_plugin(
            &path,
            &PluginConfiguration {
                exclude_text_less_images: true,
            },
        )
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# my server"));

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.plugin.exclude_text_less_images);
    }

    #[test]
    fn update_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("textless.toml");

        update_plugin(
            &path,
            &PluginConfiguration {
                exclude_text_less_images: true,
            },
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.plugin.exclude_text_less_images);
        assert_eq!(config.server.port, 8096);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textless.toml");
        let mut config = Config::default();
        config.server.port = 8200;
        config.tmdb.api_key = "k".into();

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.server.port, 8200);
        assert_eq!(loaded.tmdb.api_key, "k");
    }
}
