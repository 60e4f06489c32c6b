//! Host item model.
//!
//! A trimmed-down view of the media server's library entities: just what the
//! image providers need to decide whether they apply and which TMDb entry to
//! look up.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language used when an item carries no preferred metadata language.
pub const DEFAULT_METADATA_LANGUAGE: &str = "en";

/// Kind of library entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Movie,
    Trailer,
    Series,
    Season,
    Episode,
    Person,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Trailer => "trailer",
            Self::Series => "series",
            Self::Season => "season",
            Self::Episode => "episode",
            Self::Person => "person",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "trailer" => Ok(Self::Trailer),
            "series" | "tv" => Ok(Self::Series),
            "season" => Ok(Self::Season),
            "episode" => Ok(Self::Episode),
            "person" => Ok(Self::Person),
            other => Err(format!("unknown item type: {other}")),
        }
    }
}

/// External catalogs an item may carry identifiers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataProviderKind {
    Tmdb,
    Imdb,
    Tvdb,
}

impl MetadataProviderKind {
    /// Key under which the id is stored on an item.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Tmdb => "Tmdb",
            Self::Imdb => "Imdb",
            Self::Tvdb => "Tvdb",
        }
    }
}

/// A library entity as seen by the image providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseItem {
    pub kind: ItemKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub preferred_metadata_language: Option<String>,
    #[serde(default)]
    pub provider_ids: HashMap<String, String>,
}

impl BaseItem {
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            preferred_metadata_language: None,
            provider_ids: HashMap::new(),
        }
    }

    /// Builder-style setter for a provider id.
    pub fn with_provider_id(mut self, provider: MetadataProviderKind, id: impl Into<String>) -> Self {
        self.set_provider_id(provider, id);
        self
    }

    /// Builder-style setter for the preferred metadata language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.preferred_metadata_language = Some(language.into());
        self
    }

    pub fn set_provider_id(&mut self, provider: MetadataProviderKind, id: impl Into<String>) {
        self.provider_ids
            .retain(|k, _| !k.eq_ignore_ascii_case(provider.key()));
        self.provider_ids.insert(provider.key().to_string(), id.into());
    }

    /// Look up a provider id. Keys match case-insensitively and blank values
    /// count as absent.
    pub fn get_provider_id(&self, provider: MetadataProviderKind) -> Option<&str> {
        self.provider_ids
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(provider.key()))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Language metadata should be fetched in, falling back to
    /// [`DEFAULT_METADATA_LANGUAGE`].
    pub fn preferred_metadata_language(&self) -> &str {
        self.preferred_metadata_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_METADATA_LANGUAGE)
    }
}
