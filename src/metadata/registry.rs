//! Provider registry for managing multiple [`RemoteImageProvider`] implementations.
//!
//! The [`ProviderRegistry`] plays the host's role: it routes an item to every
//! provider that supports it, in priority order, and merges what they return.
//! One provider failing does not sink the others.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::provider::{ImageType, RemoteImageProvider, RemoteImageResult};
use crate::error::{Error, Result};
use crate::item::BaseItem;

/// A registry that manages multiple [`RemoteImageProvider`] implementations.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use textless::metadata::registry::ProviderRegistry;
///
/// let mut registry = ProviderRegistry::new();
/// registry.register(Arc::new(my_provider));
///
/// let result = registry.get_remote_images(&item, None, &cancel).await?;
/// ```
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn RemoteImageProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a new image provider.
    pub fn register(&mut self, provider: Arc<dyn RemoteImageProvider>) {
        self.providers.push(provider);
    }

    /// All registered providers, in registration order.
    pub fn providers(&self) -> &[Arc<dyn RemoteImageProvider>] {
        &self.providers
    }

    /// Look up a provider by its [`RemoteImageProvider::name`].
    ///
    /// Several providers may share a name; the first registered one wins.
    pub fn get(&self, name: &str) -> Option<&dyn RemoteImageProvider> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .map(|p| p.as_ref())
    }

    /// Providers that support `item`, sorted by ascending
    /// [`order`](RemoteImageProvider::order). Ties keep registration order.
    pub fn for_item(&self, item: &BaseItem) -> Vec<&dyn RemoteImageProvider> {
        let mut supporting: Vec<&dyn RemoteImageProvider> = self
            .providers
            .iter()
            .filter(|p| p.supports(item))
            .map(|p| p.as_ref())
            .collect();
        supporting.sort_by_key(|p| p.order());
        supporting
    }

    /// Collect remote images for `item` from every supporting provider.
    ///
    /// Providers run one after another. A provider that fails is logged and
    /// skipped; cancellation aborts the whole query. When `image_type` is
    /// given, only records of that type (and only providers declaring it) are
    /// kept.
    pub async fn get_remote_images(
        &self,
        item: &BaseItem,
        image_type: Option<ImageType>,
        cancel: &CancellationToken,
    ) -> Result<RemoteImageResult> {
        let mut result = RemoteImageResult::default();

        for provider in self.for_item(item) {
            if let Some(wanted) = image_type {
                if !provider.supported_images(item).contains(&wanted) {
                    continue;
                }
            }

            match provider.get_images(item, cancel).await {
                Ok(images) => {
                    result.images.extend(
                        images
                            .into_iter()
                            .filter(|i| image_type.map_or(true, |t| i.image_type == t)),
                    );
                    result.providers.push(provider.name().to_string());
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        item = %item.name,
                        error = %e,
                        "Image provider failed, continuing with the rest"
                    );
                }
            }
        }

        result.total_record_count = result.images.len();
        Ok(result)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
