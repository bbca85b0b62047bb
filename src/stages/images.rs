use std::collections::HashSet;

use crate::{
    catalog::{ImageRecord, Post},
    flickr::PhotoService,
};

/// Looks up metadata and sizes for every referenced photo. Photos the
/// service cannot describe (deleted, private) are logged and left out.
pub fn catalog_images(service: &dyn PhotoService, posts: &[Post]) -> Vec<ImageRecord> {
    let mut images = Vec::new();
    let mut seen = HashSet::new();
    for post in posts {
        tracing::info!(post_id = post.id, title = %post.title, "cataloging images");
        for reference in &post.image_references {
            if !seen.insert(reference.flickr_id.as_str()) {
                continue;
            }
            match describe(service, &reference.flickr_id) {
                Ok(image) => {
                    tracing::info!(flickr_id = %image.id, sizes = image.sizes.len(), "cataloged");
                    images.push(image);
                }
                Err(err) => {
                    tracing::warn!(
                        flickr_id = %reference.flickr_id,
                        error = %err,
                        "skipping image"
                    );
                }
            }
        }
    }
    images
}

fn describe(service: &dyn PhotoService, photo_id: &str) -> crate::error::Result<ImageRecord> {
    let mut image = service.photo_info(photo_id)?;
    image.sizes = service.photo_sizes(photo_id)?;
    Ok(image)
}
