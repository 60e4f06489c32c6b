//! Textless-aware image selection.
//!
//! TMDb tags posters that carry a title treatment with the language of that
//! text; posters without a tag are usually clean artwork. The filter here only
//! ever narrows the poster group, and only when doing so leaves something
//! behind.

use super::client::{ImageDescriptor, MetadataClient};
use super::provider::RemoteImageInfo;

/// Apply the exclude-textless policy to a poster list.
///
/// With `exclude_textless` set and at least one tagged poster present, only
/// tagged posters are kept. In every other case, including a list with no
/// tagged posters at all, the input comes back unchanged. Order is preserved.
pub fn select_textless_aware_posters(
    mut posters: Vec<ImageDescriptor>,
    exclude_textless: bool,
) -> Vec<ImageDescriptor> {
    if exclude_textless && posters.iter().any(ImageDescriptor::has_language) {
        posters.retain(ImageDescriptor::has_language);
    }
    posters
}

/// Concatenate posters, backdrops and logos into normalized records.
///
/// Each group keeps its source order; conversion is delegated to the metadata
/// client so URLs and language tags follow its conventions.
pub fn assemble_images(
    client: &dyn MetadataClient,
    posters: &[ImageDescriptor],
    backdrops: &[ImageDescriptor],
    logos: &[ImageDescriptor],
    language: &str,
) -> Vec<RemoteImageInfo> {
    let mut images = Vec::with_capacity(posters.len() + backdrops.len() + logos.len());
    images.extend(client.convert_posters_to_remote_image_info(posters, language));
    images.extend(client.convert_backdrops_to_remote_image_info(backdrops, language));
    images.extend(client.convert_logos_to_remote_image_info(logos, language));
    images
}
