use std::collections::BTreeMap;

use reqwest::blocking::Client;

use crate::{
    catalog::{ImageRecord, SizeVariant},
    error::Result,
    fs_tools::LocalStore,
};

pub const ORIGINAL: &str = "Original";

/// Medium size labels in order of preference, with the filename suffix
/// each one is stored under.
pub const MEDIUM_PREFERENCE: [(&str, &str); 3] = [
    ("Medium 800", "_800"),
    ("Medium 640", "_640"),
    ("Medium", "_500"),
];

pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Default)]
pub struct HttpFetcher {
    client: Client,
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let content = self.client.get(url).send()?.error_for_status()?.bytes()?;
        Ok(content.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Download {
    Fetched,
    Exists,
}

/// Filenames of the local copies of one photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalFiles {
    pub original: Option<String>,
    pub medium: Option<String>,
}

pub fn original_filename(photo_id: &str) -> String {
    format!("{}.jpg", photo_id)
}

/// The preferred medium variant and the filename it is stored under.
pub fn medium_variant<'a>(
    photo_id: &str,
    sizes: &'a BTreeMap<String, SizeVariant>,
) -> Option<(&'a SizeVariant, String)> {
    MEDIUM_PREFERENCE.iter().find_map(|(label, suffix)| {
        sizes
            .get(*label)
            .map(|size| (size, format!("{}{}.jpg", photo_id, suffix)))
    })
}

/// The files the download stage produces for `image`, whether or not they
/// have been downloaded yet.
pub fn expected_files(image: &ImageRecord) -> LocalFiles {
    LocalFiles {
        original: image
            .sizes
            .contains_key(ORIGINAL)
            .then(|| original_filename(&image.id)),
        medium: medium_variant(&image.id, &image.sizes).map(|(_, filename)| filename),
    }
}

pub fn download_size(
    fetcher: &dyn Fetcher,
    store: &LocalStore,
    url: &str,
    filename: &str,
) -> Result<Download> {
    if store.contains(filename) {
        tracing::info!(filename, "exists");
        return Ok(Download::Exists);
    }
    tracing::info!(filename, url, "downloading");
    let content = fetcher.fetch(url)?;
    if store.write_new(filename, &content)? {
        Ok(Download::Fetched)
    } else {
        Ok(Download::Exists)
    }
}

pub fn download_photo(
    fetcher: &dyn Fetcher,
    store: &LocalStore,
    image: &ImageRecord,
) -> Result<LocalFiles> {
    let mut files = LocalFiles::default();
    match medium_variant(&image.id, &image.sizes) {
        Some((size, filename)) => {
            download_size(fetcher, store, &size.source, &filename)?;
            files.medium = Some(filename);
        }
        None => {
            let available: Vec<_> = image.sizes.keys().collect();
            tracing::warn!(flickr_id = %image.id, ?available, "no medium size");
        }
    }
    match image.sizes.get(ORIGINAL) {
        Some(size) => {
            let filename = original_filename(&image.id);
            download_size(fetcher, store, &size.source, &filename)?;
            files.original = Some(filename);
        }
        None => tracing::warn!(flickr_id = %image.id, "no original size"),
    }
    Ok(files)
}

pub fn download_images(
    fetcher: &dyn Fetcher,
    store: &LocalStore,
    images: &[ImageRecord],
) -> Result<Vec<LocalFiles>> {
    tracing::info!(dir = %store.dir().display(), images = images.len(), "downloading images");
    images
        .iter()
        .map(|image| download_photo(fetcher, store, image))
        .collect()
}
