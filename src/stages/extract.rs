use crate::{catalog::Post, processing::LinkExtractor};

/// Replaces each post's `image_references` with the links currently in its
/// body.
pub fn process_posts(extractor: &LinkExtractor, posts: Vec<Post>) -> Vec<Post> {
    posts
        .into_iter()
        .map(|mut post| {
            post.image_references = extractor.extract(&post.content);
            tracing::info!(
                post_id = post.id,
                title = %post.title,
                links = post.image_references.len(),
                "extracted links"
            );
            for reference in &post.image_references {
                tracing::debug!(
                    flickr_id = %reference.flickr_id,
                    url = %reference.url,
                    start = reference.start
                );
            }
            post
        })
        .collect()
}
