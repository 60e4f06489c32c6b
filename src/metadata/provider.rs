//! Trait definition and types for remote image providers.
//!
//! This module defines the [`RemoteImageProvider`] trait that every image
//! source registered with the host must implement, along with the normalized
//! image records providers hand back.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::item::BaseItem;

/// Display name shared by every TMDb-backed provider.
pub const PROVIDER_NAME: &str = "TheMovieDb";

// ---------------------------------------------------------------------------
// Image records
// ---------------------------------------------------------------------------

/// Image category a record is offered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageType {
    Primary,
    Backdrop,
    Logo,
    Thumb,
}

impl ImageType {
    pub const ALL: [ImageType; 4] = [Self::Primary, Self::Backdrop, Self::Logo, Self::Thumb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Backdrop => "Backdrop",
            Self::Logo => "Logo",
            Self::Thumb => "Thumb",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "poster" => Ok(Self::Primary),
            "backdrop" => Ok(Self::Backdrop),
            "logo" => Ok(Self::Logo),
            "thumb" | "thumbnail" => Ok(Self::Thumb),
            other => Err(format!("unknown image type: {other}")),
        }
    }
}

/// How `community_rating` should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingType {
    Score,
    Likes,
}

/// A candidate image, normalized for presentation by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteImageInfo {
    /// Name of the provider that produced this record.
    pub provider_name: String,
    /// Absolute URL the image bytes can be fetched from.
    pub url: String,
    #[serde(rename = "Type")]
    pub image_type: ImageType,
    /// Language tag, possibly widened to the requested region (`en` -> `en-US`).
    pub language: Option<String>,
    /// Only reported when the URL points at the original-size image.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub community_rating: Option<f64>,
    pub vote_count: Option<u32>,
    pub rating_type: RatingType,
}

/// Aggregated response for a "remote images for item" query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteImageResult {
    pub images: Vec<RemoteImageInfo>,
    pub total_record_count: usize,
    /// Providers that answered successfully, in query order.
    pub providers: Vec<String>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that all remote image providers must implement.
///
/// Several providers may compete for the same item; the host routes requests
/// using [`supports`](Self::supports) and breaks ties with
/// [`order`](Self::order) (lower runs first).
#[async_trait]
pub trait RemoteImageProvider: Send + Sync {
    /// Display name (e.g. `"TheMovieDb"`).
    fn name(&self) -> &str;

    /// Relative priority among providers of the same image category.
    fn order(&self) -> i32;

    /// Returns `true` when this provider can supply images for `item`.
    fn supports(&self, item: &BaseItem) -> bool;

    /// Image categories this provider claims to supply for `item`.
    fn supported_images(&self, item: &BaseItem) -> Vec<ImageType>;

    /// Fetch candidate images for `item`.
    ///
    /// Missing metadata yields `Ok(vec![])`; transport failures and
    /// cancellation are returned as errors.
    async fn get_images(
        &self,
        item: &BaseItem,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteImageInfo>>;

    /// Fetch the bytes behind one of the URLs returned by
    /// [`get_images`](Self::get_images), unmodified.
    async fn get_image_response(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response>;
}
