//! TV series image provider powered by TMDb.
//!
//! Unlike movies, series are only looked up by a stored TMDb id; there is no
//! fallback through other catalogs.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{fetch_image, parse_tmdb_id, SUPPORTED_IMAGES};
use crate::error::Result;
use crate::item::{BaseItem, ItemKind, MetadataProviderKind};
use crate::metadata::client::MetadataClient;
use crate::metadata::provider::{ImageType, RemoteImageInfo, RemoteImageProvider, PROVIDER_NAME};
use crate::metadata::selection::{assemble_images, select_textless_aware_posters};
use crate::plugin::{exclude_text_less_images, ConfigurationSource};

const SERIES_PROVIDER_ORDER: i32 = 2;

pub struct TmdbSeriesImageProvider {
    http: reqwest::Client,
    client: Arc<dyn MetadataClient>,
    configuration: Arc<dyn ConfigurationSource>,
}

impl TmdbSeriesImageProvider {
    pub fn new(
        http: reqwest::Client,
        client: Arc<dyn MetadataClient>,
        configuration: Arc<dyn ConfigurationSource>,
    ) -> Self {
        Self {
            http,
            client,
            configuration,
        }
    }
}

#[async_trait]
impl RemoteImageProvider for TmdbSeriesImageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn order(&self) -> i32 {
        SERIES_PROVIDER_ORDER
    }

    fn supports(&self, item: &BaseItem) -> bool {
        item.kind == ItemKind::Series
    }

    fn supported_images(&self, _item: &BaseItem) -> Vec<ImageType> {
        SUPPORTED_IMAGES.to_vec()
    }

    async fn get_images(
        &self,
        item: &BaseItem,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteImageInfo>> {
        let exclude_textless = exclude_text_less_images(self.configuration.as_ref());
        debug!(item = %item.name, exclude_textless, "Fetching TMDb series images");

        let Some(tmdb_id) = parse_tmdb_id(item.get_provider_id(MetadataProviderKind::Tmdb)) else {
            return Ok(Vec::new());
        };

        let language = item.preferred_metadata_language();

        let Some(series) = self.client.get_series(tmdb_id, None, None, cancel).await? else {
            return Ok(Vec::new());
        };
        let Some(images) = series.images else {
            return Ok(Vec::new());
        };

        let posters = select_textless_aware_posters(images.posters, exclude_textless);
        Ok(assemble_images(
            self.client.as_ref(),
            &posters,
            &images.backdrops,
            &images.logos,
            language,
        ))
    }

    async fn get_image_response(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response> {
        fetch_image(&self.http, url, cancel).await
    }
}
