//! External-id descriptors for cross-linking library entities to TMDb pages.
//!
//! These make no network calls; the host uses them to render "view on TMDb"
//! links for items that carry a TMDb id.

use serde::Serialize;

use super::provider::PROVIDER_NAME;
use crate::item::{BaseItem, ItemKind, MetadataProviderKind};

/// Public website base, as opposed to the API base.
pub const BASE_TMDB_URL: &str = "https://www.themoviedb.org/";

/// Entity kind an external id applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExternalIdMediaType {
    Person,
    Series,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExternalIdInfo {
    pub provider_name: &'static str,
    pub key: &'static str,
    #[serde(rename = "Type")]
    pub media_type: ExternalIdMediaType,
    /// Page URL with `{0}` standing in for the id.
    pub url_format_string: String,
}

impl ExternalIdInfo {
    pub fn person() -> Self {
        Self {
            provider_name: PROVIDER_NAME,
            key: MetadataProviderKind::Tmdb.key(),
            media_type: ExternalIdMediaType::Person,
            url_format_string: format!("{BASE_TMDB_URL}person/{{0}}"),
        }
    }

    pub fn series() -> Self {
        Self {
            provider_name: PROVIDER_NAME,
            key: MetadataProviderKind::Tmdb.key(),
            media_type: ExternalIdMediaType::Series,
            url_format_string: format!("{BASE_TMDB_URL}tv/{{0}}"),
        }
    }

    pub fn supports(&self, item: &BaseItem) -> bool {
        match self.media_type {
            ExternalIdMediaType::Person => item.kind == ItemKind::Person,
            ExternalIdMediaType::Series => item.kind == ItemKind::Series,
        }
    }

    /// Page URL for a concrete id.
    pub fn url_for(&self, id: &str) -> String {
        self.url_format_string.replace("{0}", id)
    }

    /// Link for `item`, when this descriptor applies and the item has a TMDb id.
    pub fn link_for(&self, item: &BaseItem) -> Option<String> {
        if !self.supports(item) {
            return None;
        }
        item.get_provider_id(MetadataProviderKind::Tmdb)
            .map(|id| self.url_for(id))
    }
}

/// Every external-id descriptor this plugin declares.
pub fn external_ids() -> Vec<ExternalIdInfo> {
    vec![ExternalIdInfo::person(), ExternalIdInfo::series()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_url() {
        let person = ExternalIdInfo::person();
        assert_eq!(person.url_format_string, "https://www.themoviedb.org/person/{0}");
        assert_eq!(person.url_for("287"), "https://www.themoviedb.org/person/287");
        assert_eq!(person.key, "Tmdb");
        assert_eq!(person.provider_name, "TheMovieDb");
    }

    #[test]
    fn series_applies_to_series_only() {
        let series = ExternalIdInfo::series();
        assert!(series.supports(&BaseItem::new(ItemKind::Series, "s")));
        assert!(!series.supports(&BaseItem::new(ItemKind::Movie, "m")));
        assert!(!ExternalIdInfo::person().supports(&BaseItem::new(ItemKind::Series, "s")));
    }

    #[test]
    fn link_requires_tmdb_id() {
        let series = ExternalIdInfo::series();
        let item = BaseItem::new(ItemKind::Series, "s");
        assert_eq!(series.link_for(&item), None);
        let item = item.with_provider_id(MetadataProviderKind::Tmdb, "1399");
        assert_eq!(
            series.link_for(&item).as_deref(),
            Some("https://www.themoviedb.org/tv/1399")
        );
    }

    #[test]
    fn declares_person_and_series() {
        let kinds: Vec<ExternalIdMediaType> = external_ids().iter().map(|e| e.media_type).collect();
        assert_eq!(kinds, [ExternalIdMediaType::Person, ExternalIdMediaType::Series]);
    }
}
