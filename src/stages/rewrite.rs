use std::io::{BufRead, Write};

use crate::{
    catalog::Post,
    error::{Error, Result},
    processing::{apply_splices, classify_context, Splice},
    wordpress::Blog,
};

/// What the operator has to type before any post is modified.
pub const CONFIRMATION: &str = "yes";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    pub updated: usize,
    pub unchanged: usize,
}

/// Prompts on `output` and reads one line from `input`. Anything but the
/// exact confirmation literal is refused.
pub fn confirm(input: &mut impl BufRead, output: &mut impl Write, posts: usize) -> Result<()> {
    let prompt = format!(
        "About to rewrite up to {} posts on the blog. Type '{}' to continue: ",
        posts, CONFIRMATION
    );
    output
        .write_all(prompt.as_bytes())
        .and_then(|_| output.flush())
        .map_err(|err| Error::io("<stdout>", err))?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|err| Error::io("<stdin>", err))?;
    if answer.trim_end_matches(|c: char| c == '\r' || c == '\n') == CONFIRMATION {
        Ok(())
    } else {
        Err(Error::NotConfirmed)
    }
}

/// The post body with every uploaded reference replaced by its re-hosted
/// URL, or `None` if nothing changed.
pub fn rewrite_body(post: &Post) -> Option<String> {
    let body = &post.content;
    let mut splices = Vec::with_capacity(post.image_references.len());
    for reference in &post.image_references {
        let Some(upload) = post.upload_info.get(&reference.flickr_id) else {
            tracing::warn!(
                post_id = post.id,
                flickr_id = %reference.flickr_id,
                "no upload info, leaving link"
            );
            continue;
        };
        let context = classify_context(body, reference.start);
        tracing::debug!(
            post_id = post.id,
            flickr_id = %reference.flickr_id,
            ?context,
            "replacing link"
        );
        splices.push(Splice {
            start: reference.start,
            end: reference.end,
            replacement: context.pick(upload),
        });
    }
    let (rewritten, rejected) = apply_splices(body, splices);
    for splice in rejected {
        tracing::warn!(
            post_id = post.id,
            start = splice.start,
            end = splice.end,
            "link span outside body or overlapping another, skipped"
        );
    }
    (rewritten != *body).then_some(rewritten)
}

/// Pushes rewritten bodies for the first `limit` posts. Posts whose body
/// did not change are not sent.
pub fn update_posts(
    blog: &dyn Blog,
    posts: &[Post],
    limit: Option<usize>,
) -> Result<RewriteStats> {
    let mut stats = RewriteStats::default();
    for post in posts.iter().take(limit.unwrap_or(posts.len())) {
        match rewrite_body(post) {
            Some(body) => {
                tracing::info!(post_id = post.id, title = %post.title, "updating post");
                blog.update_post(post.id, &body)?;
                stats.updated += 1;
            }
            None => {
                tracing::info!(post_id = post.id, "unchanged");
                stats.unchanged += 1;
            }
        }
    }
    tracing::info!(updated = stats.updated, unchanged = stats.unchanged, "rewrite finished");
    Ok(stats)
}
