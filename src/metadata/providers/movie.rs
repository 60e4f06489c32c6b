//! Movie image provider powered by TMDb.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{fetch_image, parse_tmdb_id, SUPPORTED_IMAGES};
use crate::error::Result;
use crate::item::{BaseItem, ItemKind, MetadataProviderKind};
use crate::metadata::client::{ExternalSource, MetadataClient};
use crate::metadata::provider::{ImageType, RemoteImageInfo, RemoteImageProvider, PROVIDER_NAME};
use crate::metadata::selection::{assemble_images, select_textless_aware_posters};
use crate::plugin::{exclude_text_less_images, ConfigurationSource};

/// Movies get first pick among competing providers.
const MOVIE_PROVIDER_ORDER: i32 = 0;

/// Work out the TMDb id for a movie.
///
/// A stored TMDb id wins. Without one, an IMDb id is resolved through a single
/// `/find` lookup and the first movie match is used. `Ok(None)` means neither
/// path produced an id.
pub async fn resolve_movie_tmdb_id(
    client: &dyn MetadataClient,
    item: &BaseItem,
    language: &str,
    cancel: &CancellationToken,
) -> Result<Option<u64>> {
    if let Some(id) = parse_tmdb_id(item.get_provider_id(MetadataProviderKind::Tmdb)) {
        return Ok(Some(id));
    }

    let Some(imdb_id) = item.get_provider_id(MetadataProviderKind::Imdb) else {
        return Ok(None);
    };

    let found = client
        .find_by_external_id(imdb_id, ExternalSource::Imdb, language, cancel)
        .await?;
    let resolved = found.movie_results.first().map(|m| m.id).filter(|id| *id > 0);
    debug!(imdb_id = %imdb_id, tmdb_id = ?resolved, "Resolved movie through IMDb id");

    Ok(resolved)
}

/// Movie and trailer images from TMDb, with the textless-poster filter applied.
pub struct TmdbMovieImageProvider {
    http: reqwest::Client,
    client: Arc<dyn MetadataClient>,
    configuration: Arc<dyn ConfigurationSource>,
}

impl TmdbMovieImageProvider {
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
impl RemoteImageProvider for TmdbMovieImageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn order(&self) -> i32 {
        MOVIE_PROVIDER_ORDER
    }

    fn supports(&self, item: &BaseItem) -> bool {
        matches!(item.kind, ItemKind::Movie | ItemKind::Trailer)
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
        debug!(item = %item.name, exclude_textless, "Fetching TMDb movie images");

        let language = item.preferred_metadata_language();

        let Some(tmdb_id) =
            resolve_movie_tmdb_id(self.client.as_ref(), item, language, cancel).await?
        else {
            debug!(item = %item.name, "No TMDb id for movie");
            return Ok(Vec::new());
        };

        // All image languages: the item's language filter is applied by the host.
        let Some(movie) = self.client.get_movie(tmdb_id, None, None, cancel).await? else {
            return Ok(Vec::new());
        };
        let Some(images) = movie.images else {
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
