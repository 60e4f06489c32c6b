//! Metadata client collaborator.
//!
//! [`MetadataClient`] is the narrow slice of the TMDb API that the image
//! providers consume, plus the conversion helpers that turn raw image
//! descriptors into [`RemoteImageInfo`] records. The production implementation
//! lives in [`super::tmdb`]; tests substitute stubs.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::provider::{ImageType, RemoteImageInfo};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// Metadata about one candidate image, as returned by TMDb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Path relative to the image base URL, e.g. `/abc123.jpg`.
    pub file_path: String,
    /// ISO-639-1 tag. `None` usually means the image has no text on it.
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
}

impl ImageDescriptor {
    pub fn new(file_path: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            file_path: file_path.into(),
            iso_639_1: language.map(str::to_string),
            ..Self::default()
        }
    }

    /// Whether the descriptor carries a language tag.
    pub fn has_language(&self) -> bool {
        self.iso_639_1.is_some()
    }
}

/// Image block attached to a movie or series detail response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageCollection {
    #[serde(default)]
    pub posters: Vec<ImageDescriptor>,
    #[serde(default)]
    pub backdrops: Vec<ImageDescriptor>,
    #[serde(default)]
    pub logos: Vec<ImageDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub images: Option<ImageCollection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDetails {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Option<ImageCollection>,
}

/// Catalog an external id belongs to when resolving it through TMDb.
///
/// Only movies fall back to an external id, and only through IMDb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalSource {
    Imdb,
}

impl ExternalSource {
    /// Value of TMDb's `external_source` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Imdb => "imdb_id",
        }
    }
}

/// A single hit from `/find/{external_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatch {
    pub id: u64,
    /// Movie title or series name.
    #[serde(default, alias = "name")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindResult {
    #[serde(default)]
    pub movie_results: Vec<FindMatch>,
    #[serde(default)]
    pub tv_results: Vec<FindMatch>,
}

/// Image section of TMDb's `/configuration` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageConfiguration {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub secure_base_url: String,
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
    #[serde(default)]
    pub logo_sizes: Vec<String>,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    #[serde(default)]
    pub profile_sizes: Vec<String>,
    #[serde(default)]
    pub still_sizes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfiguration {
    #[serde(default)]
    pub images: ImageConfiguration,
    #[serde(default)]
    pub change_keys: Vec<String>,
}

// ---------------------------------------------------------------------------
// Client trait
// ---------------------------------------------------------------------------

/// The metadata-provider operations the image providers depend on.
///
/// Every network call takes a [`CancellationToken`]; firing it aborts the
/// in-flight request and yields [`Error::Cancelled`].
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Fetch the provider's client configuration (image base URLs and sizes).
    async fn client_configuration(&self, cancel: &CancellationToken) -> Result<ClientConfiguration>;

    /// Resolve an id from another catalog (e.g. IMDb) to TMDb entries.
    async fn find_by_external_id(
        &self,
        external_id: &str,
        source: ExternalSource,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<FindResult>;

    /// Movie details with the image block appended. `Ok(None)` when TMDb has
    /// no such movie.
    async fn get_movie(
        &self,
        id: u64,
        language: Option<&str>,
        image_languages: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<MovieDetails>>;

    /// Series details with the image block appended. `Ok(None)` when TMDb has
    /// no such series.
    async fn get_series(
        &self,
        id: u64,
        language: Option<&str>,
        image_languages: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<SeriesDetails>>;

    /// Map descriptors of one image group to normalized records, in order.
    fn convert_to_remote_image_info(
        &self,
        images: &[ImageDescriptor],
        image_type: ImageType,
        language: &str,
    ) -> Vec<RemoteImageInfo>;

    fn convert_posters_to_remote_image_info(
        &self,
        posters: &[ImageDescriptor],
        language: &str,
    ) -> Vec<RemoteImageInfo> {
        self.convert_to_remote_image_info(posters, ImageType::Primary, language)
    }

    fn convert_backdrops_to_remote_image_info(
        &self,
        backdrops: &[ImageDescriptor],
        language: &str,
    ) -> Vec<RemoteImageInfo> {
        self.convert_to_remote_image_info(backdrops, ImageType::Backdrop, language)
    }

    fn convert_logos_to_remote_image_info(
        &self,
        logos: &[ImageDescriptor],
        language: &str,
    ) -> Vec<RemoteImageInfo> {
        self.convert_to_remote_image_info(logos, ImageType::Logo, language)
    }
}

/// Race `fut` against `cancel`. A fired token wins even if `fut` is ready.
pub async fn with_cancellation<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}
