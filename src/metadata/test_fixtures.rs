use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::metadata::client::{
    ClientConfiguration, ExternalSource, FindMatch, FindResult, ImageCollection, ImageDescriptor,
    MetadataClient, MovieDetails, SeriesDetails,
};
use crate::metadata::provider::{ImageType, RatingType, RemoteImageInfo, PROVIDER_NAME};

/// In-memory [`MetadataClient`] that records calls and serves canned data.
///
/// Converted records use the raw `file_path` as URL so tests can assert on
/// ordering without caring about base URLs.
#[derive(Default)]
pub struct StubClient {
    pub find: FindResult,
    pub movie: Option<MovieDetails>,
    pub series: Option<SeriesDetails>,
    pub fail_details: bool,
    pub find_calls: Mutex<Vec<String>>,
    pub movie_calls: Mutex<Vec<u64>>,
    pub series_calls: Mutex<Vec<u64>>,
}

impl StubClient {
    pub fn with_movie(movie: MovieDetails) -> Self {
        Self {
            movie: Some(movie),
            ..Self::default()
        }
    }

    pub fn with_series(series: SeriesDetails) -> Self {
        Self {
            series: Some(series),
            ..Self::default()
        }
    }

    pub fn resolving_to(mut self, tmdb_id: u64) -> Self {
        self.find.movie_results = vec![FindMatch {
            id: tmdb_id,
            title: None,
        }];
        self
    }
}

#[async_trait]
impl MetadataClient for StubClient {
    async fn client_configuration(&self, cancel: &CancellationToken) -> Result<ClientConfiguration> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(ClientConfiguration::default())
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
        _source: ExternalSource,
        _language: &str,
        cancel: &CancellationToken,
    ) -> Result<FindResult> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.find_calls.lock().push(external_id.to_string());
        Ok(self.find.clone())
    }

    async fn get_movie(
        &self,
        id: u64,
        _language: Option<&str>,
        _image_languages: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<MovieDetails>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.movie_calls.lock().push(id);
        if self.fail_details {
            return Err(Error::Status {
                status: 500,
                url: format!("/movie/{id}"),
            });
        }
        Ok(self.movie.clone())
    }

    async fn get_series(
        &self,
        id: u64,
        _language: Option<&str>,
        _image_languages: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<SeriesDetails>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.series_calls.lock().push(id);
        if self.fail_details {
            return Err(Error::Status {
                status: 500,
                url: format!("/tv/{id}"),
            });
        }
        Ok(self.series.clone())
    }

    fn convert_to_remote_image_info(
        &self,
        images: &[ImageDescriptor],
        image_type: ImageType,
        _language: &str,
    ) -> Vec<RemoteImageInfo> {
        images
            .iter()
            .map(|img| RemoteImageInfo {
                provider_name: PROVIDER_NAME.into(),
                url: img.file_path.clone(),
                image_type,
                language: img.iso_639_1.clone(),
                width: Some(img.width),
                height: Some(img.height),
                community_rating: Some(img.vote_average),
                vote_count: Some(img.vote_count),
                rating_type: RatingType::Score,
            })
            .collect()
    }
}

/// Three posters (en, untagged, fr), one backdrop, one logo.
pub fn sample_images() -> ImageCollection {
    ImageCollection {
        posters: vec![
            ImageDescriptor::new("/p-en.jpg", Some("en")),
            ImageDescriptor::new("/p-none.jpg", None),
            ImageDescriptor::new("/p-fr.jpg", Some("fr")),
        ],
        backdrops: vec![ImageDescriptor::new("/b.jpg", None)],
        logos: vec![ImageDescriptor::new("/l.png", Some("en"))],
    }
}

pub fn sample_movie() -> MovieDetails {
    MovieDetails {
        id: 603,
        title: Some("The Matrix".into()),
        imdb_id: Some("tt0133093".into()),
        images: Some(sample_images()),
    }
}

pub fn sample_series() -> SeriesDetails {
    SeriesDetails {
        id: 1399,
        name: Some("Game of Thrones".into()),
        images: Some(sample_images()),
    }
}

pub fn urls(images: &[RemoteImageInfo]) -> Vec<&str> {
    images.iter().map(|i| i.url.as_str()).collect()
}
