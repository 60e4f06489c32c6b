//! Concrete remote image provider implementations.
//!
//! One variant type per entity kind, each implementing the
//! [`RemoteImageProvider`](super::RemoteImageProvider) trait on top of a shared
//! [`MetadataClient`](super::MetadataClient).

pub mod movie;
pub mod series;

pub use movie::{resolve_movie_tmdb_id, TmdbMovieImageProvider};
pub use series::TmdbSeriesImageProvider;

use tokio_util::sync::CancellationToken;

use super::client::with_cancellation;
use super::provider::ImageType;
use crate::error::Result;

/// Image categories both TMDb providers declare.
const SUPPORTED_IMAGES: [ImageType; 4] = ImageType::ALL;

/// Parse a stored TMDb id. Blank, non-numeric and zero ids count as absent.
fn parse_tmdb_id(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.parse::<u64>().ok()).filter(|id| *id > 0)
}

/// Plain GET on the shared client; status and body are handed back untouched.
async fn fetch_image(
    http: &reqwest::Client,
    url: &str,
    cancel: &CancellationToken,
) -> Result<reqwest::Response> {
    with_cancellation(cancel, async { Ok(http.get(url).send().await?) }).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmdb_id_parsing() {
        assert_eq!(parse_tmdb_id(Some("603")), Some(603));
        assert_eq!(parse_tmdb_id(Some("0")), None);
        assert_eq!(parse_tmdb_id(Some("-4")), None);
        assert_eq!(parse_tmdb_id(Some("tt0133093")), None);
        assert_eq!(parse_tmdb_id(None), None);
    }
}
