use std::str::FromStr;

use regex::Regex;

use crate::{
    catalog::{ImageReference, UploadInfo},
    error::Result,
};

/// Substring that marks a post as worth cataloging.
pub const FLICKR_DOMAIN: &str = "flickr.com";

/// Finds Flickr links in post bodies.
pub struct LinkExtractor {
    photo_page: Regex,
    static_file: Regex,
}

impl LinkExtractor {
    pub fn new() -> Result<Self> {
        Ok(LinkExtractor {
            // The path after the id may not end in sentence punctuation.
            photo_page: Regex::from_str(concat!(
                r#"https?://(?:www\.)?flickr\.com/photos/[\w@.-]+/(\d+)"#,
                r#"(?:/(?:[^\s"'<>]*[^\s"'<>).,;:!?])?)?"#,
            ))?,
            // Older embeds carry a farm number before the server.
            static_file: Regex::from_str(concat!(
                r#"https?://(?:[\w-]+\.)?static\.?flickr\.com/(?:\d+/)?\d+/"#,
                r#"(\d+)_[0-9a-f]+(?:_[0-9a-z]+)?\.(?:jpe?g|png|gif)"#,
            ))?,
        })
    }

    /// Photo page links first, then static file links, each in the order
    /// they appear in `body`.
    pub fn extract(&self, body: &str) -> Vec<ImageReference> {
        [&self.photo_page, &self.static_file]
            .into_iter()
            .flat_map(|pattern| pattern.captures_iter(body))
            .filter_map(|captures| {
                let url = captures.get(0)?;
                let id = captures.get(1)?;
                Some(ImageReference {
                    flickr_id: id.as_str().to_string(),
                    url: url.as_str().to_string(),
                    start: url.start(),
                    end: url.end(),
                })
            })
            .collect()
    }
}

/// How a URL is embedded in the surrounding HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkContext {
    /// `href="<url>`
    Hyperlink,
    /// `src="<url>`
    Image,
    Other,
}

impl LinkContext {
    /// Hyperlinks point at the full size copy, everything else at the
    /// medium one.
    pub fn pick<'a>(&self, upload: &'a UploadInfo) -> &'a str {
        match self {
            LinkContext::Hyperlink => &upload.original,
            LinkContext::Image | LinkContext::Other => &upload.medium,
        }
    }
}

/// Classifies the URL starting at byte `offset` of `body` by the six
/// characters before it.
pub fn classify_context(body: &str, offset: usize) -> LinkContext {
    let Some(before) = body.get(..offset) else {
        return LinkContext::Other;
    };
    if before.ends_with("href=\"") {
        LinkContext::Hyperlink
    } else if before.ends_with("src=\"") {
        LinkContext::Image
    } else {
        LinkContext::Other
    }
}

/// One replacement of `body[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice<'a> {
    pub start: usize,
    pub end: usize,
    pub replacement: &'a str,
}

/// Applies `splices` from the highest start offset down so that every
/// offset still refers to the unmodified text before it. Splices whose range
/// does not fit `body`, or that overlap a splice already applied, are
/// returned unapplied.
pub fn apply_splices<'a>(
    body: &str,
    mut splices: Vec<Splice<'a>>,
) -> (String, Vec<Splice<'a>>) {
    splices.sort_by(|a, b| b.start.cmp(&a.start));
    let mut text = body.to_string();
    let mut rejected = Vec::new();
    // Start of the lowest splice applied so far; text from here on is new.
    let mut applied_from = body.len();
    for splice in splices {
        if splice.start > splice.end
            || splice.end > applied_from
            || text.get(splice.start..splice.end).is_none()
        {
            rejected.push(splice);
            continue;
        }
        text.replace_range(splice.start..splice.end, splice.replacement);
        applied_from = splice.start;
    }
    (text, rejected)
}
