//! TMDB (The Movie Database) metadata client.
//!
//! Implements [`MetadataClient`] by querying the TMDB v3 REST API.
//!
//! Kept thin:
//! - one request per call, no retries and no rate limiting,
//! - timeouts come from the shared [`reqwest::Client`],
//! - a 404 on a detail lookup means "no metadata", not an error.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use async_trait::async_trait;

use super::client::{
    with_cancellation, ClientConfiguration, ExternalSource, FindResult, ImageDescriptor,
    MetadataClient, MovieDetails, SeriesDetails,
};
use super::provider::{ImageType, RatingType, RemoteImageInfo, PROVIDER_NAME};
use crate::config::TmdbConfig;
use crate::error::{Error, Result};

/// Size segment that addresses the unscaled image.
const ORIGINAL_SIZE: &str = "original";

// ---------------------------------------------------------------------------
// Client implementation
// ---------------------------------------------------------------------------

/// TMDB metadata client.
///
/// # Examples
///
/// ```no_run
/// use textless::config::TmdbConfig;
/// use textless::metadata::tmdb::TmdbClient;
///
/// let client = TmdbClient::new(reqwest::Client::new(), &TmdbConfig::default());
/// ```
pub struct TmdbClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    poster_size: String,
    backdrop_size: String,
    logo_size: String,
}

impl TmdbClient {
    /// Create a client sharing the given HTTP connection pool.
    pub fn new(http: reqwest::Client, config: &TmdbConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            poster_size: config.poster_size.clone(),
            backdrop_size: config.backdrop_size.clone(),
            logo_size: config.logo_size.clone(),
        }
    }

    /// Returns `true` when an API key is configured.
    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// GET `path` and decode the JSON body. A 404 yields `Ok(None)`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>> {
        if !self.is_available() {
            return Err(Error::Config("TMDb API key is not configured".into()));
        }

        let url = format!("{}{path}", self.base_url);
        debug!(path = %path, "TMDB request");

        let resp = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(path = %path, "TMDB returned 404");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: path.to_string(),
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| Error::Decode(format!("{path}: {e}")))
    }

    /// Details lookup shared by movies and series.
    async fn get_details<T: DeserializeOwned>(
        &self,
        path: &str,
        language: Option<&str>,
        image_languages: Option<&str>,
    ) -> Result<Option<T>> {
        let mut params = vec![("append_to_response", "images")];
        if let Some(language) = language {
            params.push(("language", language));
        }
        if let Some(image_languages) = image_languages {
            params.push(("include_image_language", image_languages));
        }
        self.get(path, &params).await
    }

    fn size_for(&self, image_type: ImageType) -> &str {
        match image_type {
            ImageType::Primary => &self.poster_size,
            ImageType::Backdrop | ImageType::Thumb => &self.backdrop_size,
            ImageType::Logo => &self.logo_size,
        }
    }

    /// Full URL for an image path at the given size.
    fn image_url(&self, size: &str, path: &str) -> String {
        format!("{}{size}{path}", self.image_base_url)
    }
}

/// Build the pooled HTTP client shared by the TMDb client and image pass-through.
pub fn build_http_client(config: &TmdbConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(concat!("textless/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Widen a two-letter image language to the requested regional variant.
///
/// `("en", "en-US")` gives `"en-US"`; anything else keeps the image's own tag.
pub fn adjust_image_language(image_language: Option<&str>, requested: &str) -> Option<String> {
    match image_language {
        Some(tag)
            if tag.len() == 2
                && requested.len() > 2
                && requested
                    .get(..2)
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(tag)) =>
        {
            Some(requested.to_string())
        }
        other => other.map(str::to_string),
    }
}

#[async_trait]
impl MetadataClient for TmdbClient {
    async fn client_configuration(&self, cancel: &CancellationToken) -> Result<ClientConfiguration> {
        with_cancellation(cancel, async {
            self.get::<ClientConfiguration>("/configuration", &[])
                .await?
                .ok_or_else(|| Error::Decode("/configuration: not found".into()))
        })
        .await
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
        source: ExternalSource,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<FindResult> {
        let path = format!("/find/{external_id}");
        with_cancellation(cancel, async {
            let found = self
                .get::<FindResult>(
                    &path,
                    &[
                        ("external_source", source.as_query_value()),
                        ("language", language),
                    ],
                )
                .await?;
            Ok(found.unwrap_or_default())
        })
        .await
    }

    async fn get_movie(
        &self,
        id: u64,
        language: Option<&str>,
        image_languages: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<MovieDetails>> {
        let path = format!("/movie/{id}");
        with_cancellation(cancel, self.get_details(&path, language, image_languages)).await
    }

    async fn get_series(
        &self,
        id: u64,
        language: Option<&str>,
        image_languages: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<SeriesDetails>> {
        let path = format!("/tv/{id}");
        with_cancellation(cancel, self.get_details(&path, language, image_languages)).await
    }

    fn convert_to_remote_image_info(
        &self,
        images: &[ImageDescriptor],
        image_type: ImageType,
        language: &str,
    ) -> Vec<RemoteImageInfo> {
        let size = self.size_for(image_type);
        // Dimensions describe the original file; drop them for scaled URLs.
        let scaled = !size.eq_ignore_ascii_case(ORIGINAL_SIZE);

        images
            .iter()
            .map(|img| RemoteImageInfo {
                provider_name: PROVIDER_NAME.to_string(),
                url: self.image_url(size, &img.file_path),
                image_type,
                language: adjust_image_language(img.iso_639_1.as_deref(), language),
                width: (!scaled).then_some(img.width),
                height: (!scaled).then_some(img.height),
                community_rating: Some(img.vote_average),
                vote_count: Some(img.vote_count),
                rating_type: RatingType::Score,
            })
            .collect()
    }
}
