//! Remote image API routes.
//!
//! Lists provider images for an item described by query parameters, and
//! proxies image downloads through the provider's pass-through.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::error::AppError;
use super::{request_cancellation, AppContext};
use crate::error::Error;
use crate::item::{BaseItem, ItemKind, MetadataProviderKind};
use crate::metadata::provider::{ImageType, RemoteImageResult, PROVIDER_NAME};

pub fn image_routes() -> Router<AppContext> {
    Router::new()
        .route("/textless/Items/RemoteImages", get(remote_images))
        .route("/textless/Images/Remote", get(remote_image))
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteImagesQuery {
    /// Item kind: movie, trailer, series, ...
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Stored on the item under the `Tvdb` key. No provider resolves by it.
    #[serde(default)]
    pub tvdb_id: Option<String>,
    /// Preferred metadata language; the configured default when absent.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub image_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteImageQuery {
    pub image_url: String,
}

impl RemoteImagesQuery {
    fn to_item(&self, default_language: &str) -> Result<BaseItem, AppError> {
        let kind: ItemKind = self.item_type.parse().map_err(AppError::bad_request)?;
        let name = self.name.clone().unwrap_or_default();

        let language = self
            .language
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(default_language);

        let mut item = BaseItem::new(kind, name).with_language(language);
        for (provider, id) in [
            (MetadataProviderKind::Tmdb, &self.tmdb_id),
            (MetadataProviderKind::Imdb, &self.imdb_id),
            (MetadataProviderKind::Tvdb, &self.tvdb_id),
        ] {
            if let Some(id) = id.as_deref() {
                item.set_provider_id(provider, id);
            }
        }
        Ok(item)
    }

    fn image_type(&self) -> Result<Option<ImageType>, AppError> {
        self.image_type
            .as_deref()
            .map(|t| t.parse().map_err(AppError::bad_request))
            .transpose()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Images from every provider that supports the described item.
async fn remote_images(
    State(ctx): State<AppContext>,
    Query(query): Query<RemoteImagesQuery>,
) -> Result<Json<RemoteImageResult>, AppError> {
    let item = query.to_item(&ctx.config.tmdb.default_language)?;
    let image_type = query.image_type()?;

    let (cancel, _guard) = request_cancellation();
    let result = ctx
        .registry
        .get_remote_images(&item, image_type, &cancel)
        .await?;

    tracing::debug!(
        item_type = %item.kind,
        images = result.total_record_count,
        "Remote images listed"
    );

    Ok(Json(result))
}

/// Stream an image URL back to the caller, status and body untouched.
async fn remote_image(
    State(ctx): State<AppContext>,
    Query(query): Query<RemoteImageQuery>,
) -> Result<Response, AppError> {
    let url = query.image_url.trim();
    if !is_allowed_image_url(url, &ctx.config.tmdb.image_base_url) {
        return Err(AppError::bad_request(
            "imageUrl must point under the configured TMDb image base URL",
        ));
    }

    let provider = ctx
        .registry
        .get(PROVIDER_NAME)
        .ok_or_else(|| Error::Config("no image provider registered".into()))?;

    let (cancel, _guard) = request_cancellation();
    let upstream = provider.get_image_response(url, &cancel).await?;

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());
    let content_length = upstream
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());

    let mut response = (status, Body::from_stream(upstream.bytes_stream())).into_response();
    let headers = response.headers_mut();
    if let Some(value) = content_type {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Some(value) = content_length {
        headers.insert(header::CONTENT_LENGTH, value);
    }

    Ok(response)
}

/// `true` when `url` lies under `image_base_url`. A blank base allows nothing.
fn is_allowed_image_url(url: &str, image_base_url: &str) -> bool {
    let base = image_base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return false;
    }
    url.strip_prefix(base).is_some_and(|rest| rest.starts_with('/'))
}
