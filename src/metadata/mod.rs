//! Remote image provider system backed by TMDb.
//!
//! # Module layout
//!
//! - [`provider`] -- Provider trait and the normalized image records.
//! - [`client`] -- The metadata-client collaborator trait and TMDb payload types.
//! - [`tmdb`] -- reqwest-backed TMDb client.
//! - [`selection`] -- Textless poster filter and image assembly.
//! - [`providers`] -- Movie and series providers.
//! - [`registry`] -- Provider registry for multi-provider lookups.
//! - [`external_id`] -- External-id descriptors for TMDb page links.

pub mod client;
pub mod external_id;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod selection;
pub mod tmdb;

#[cfg(test)]
mod test_fixtures;

pub use client::{ImageDescriptor, MetadataClient};
pub use provider::{ImageType, RemoteImageInfo, RemoteImageProvider, RemoteImageResult};
pub use registry::ProviderRegistry;
pub use selection::{assemble_images, select_textless_aware_posters};
