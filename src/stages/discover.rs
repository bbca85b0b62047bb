use crate::{catalog::Post, error::Result, processing::FLICKR_DOMAIN, wordpress::Blog};

pub const PAGE_SIZE: usize = 50;

/// Pages through the blog from `offset` and keeps posts that mention
/// Flickr, stopping at the first empty page or once `limit` posts are found.
pub fn catalog_posts(
    blog: &dyn Blog,
    offset: usize,
    limit: Option<usize>,
) -> Result<Vec<Post>> {
    let mut found = Vec::new();
    let mut offset = offset;
    loop {
        if limit.is_some_and(|limit| found.len() >= limit) {
            break;
        }
        let page = blog.list_posts(offset, PAGE_SIZE)?;
        if page.is_empty() {
            break;
        }
        offset += page.len();
        for post in page {
            if !post.content.contains(FLICKR_DOMAIN) {
                continue;
            }
            tracing::info!(
                post_id = post.id,
                title = %post.title,
                link = %post.link,
                "found post"
            );
            found.push(post);
            if limit.is_some_and(|limit| found.len() >= limit) {
                break;
            }
        }
    }
    tracing::info!(posts = found.len(), "discovery finished");
    Ok(found)
}
