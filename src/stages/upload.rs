use std::collections::{BTreeSet, HashMap};

use crate::{
    catalog::{ImageRecord, Post, UploadInfo},
    error::Result,
    fs_tools::LocalStore,
    memo::UploadMemo,
    stages::download::expected_files,
    wordpress::{Blog, MediaUpload},
};

#[derive(Debug, Default, Clone)]
pub struct UploadOptions {
    /// Only the first `limit` posts of the catalog are considered.
    pub limit: Option<usize>,
    pub excludes: BTreeSet<u64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadStats {
    pub uploaded: usize,
    pub reused: usize,
    pub skipped: usize,
}

/// Uploads the local copies of every referenced photo that has no
/// `upload_info` entry yet and records the resulting URLs on the post.
/// Posts outside `limit` or listed in `excludes` are left untouched.
pub fn upload_to_blog(
    blog: &dyn Blog,
    store: &LocalStore,
    posts: &mut [Post],
    images: &[ImageRecord],
    memo: &mut UploadMemo,
    options: &UploadOptions,
) -> Result<UploadStats> {
    let images: HashMap<&str, &ImageRecord> =
        images.iter().map(|image| (image.id.as_str(), image)).collect();
    let limit = options.limit.unwrap_or(posts.len());
    let mut stats = UploadStats::default();

    for post in posts.iter_mut().take(limit) {
        if options.excludes.contains(&post.id) {
            tracing::info!(post_id = post.id, "excluded");
            continue;
        }
        tracing::info!(post_id = post.id, title = %post.title, "uploading images");
        for index in 0..post.image_references.len() {
            let flickr_id = post.image_references[index].flickr_id.clone();
            if post.upload_info.contains_key(&flickr_id) {
                continue;
            }
            let Some(image) = images.get(flickr_id.as_str()) else {
                tracing::warn!(post_id = post.id, %flickr_id, "not in image catalog");
                stats.skipped += 1;
                continue;
            };
            let files = expected_files(image);
            let Some(original) = files.original else {
                tracing::warn!(post_id = post.id, %flickr_id, "no original file");
                stats.skipped += 1;
                continue;
            };
            let original = upload_file(blog, store, memo, post, &original, &mut stats)?;
            let medium = match files.medium {
                Some(medium) => upload_file(blog, store, memo, post, &medium, &mut stats)?,
                None => original.clone(),
            };
            post.upload_info
                .insert(flickr_id, UploadInfo { original, medium });
        }
    }
    tracing::info!(
        uploaded = stats.uploaded,
        reused = stats.reused,
        skipped = stats.skipped,
        "upload finished"
    );
    Ok(stats)
}

fn upload_file(
    blog: &dyn Blog,
    store: &LocalStore,
    memo: &mut UploadMemo,
    post: &Post,
    filename: &str,
    stats: &mut UploadStats,
) -> Result<String> {
    if let Some(url) = memo.get(filename) {
        tracing::info!(filename, url, "already uploaded");
        stats.reused += 1;
        return Ok(url.to_string());
    }
    let url = blog.upload_media(MediaUpload {
        filename,
        content: store.read(filename)?,
        post_id: post.id,
        date: &post.date,
    })?;
    tracing::info!(filename, %url, "uploaded");
    memo.record(filename, &url)?;
    stats.uploaded += 1;
    Ok(url)
}
