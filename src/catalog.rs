//! Records persisted between stages.
//!
//! A post catalog is a JSON array of [`Post`], an image catalog a JSON array
//! of [`ImageRecord`]. Both are always read and written as whole documents.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub image_references: Vec<ImageReference>,
    /// Re-hosted URLs keyed by Flickr photo id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub upload_info: BTreeMap<String, UploadInfo>,
}

/// A Flickr URL found in a post body.
///
/// `start..end` is a byte range into the body as it was when the link was
/// extracted. It is not checked against later versions of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub flickr_id: String,
    pub url: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInfo {
    pub original: String,
    pub medium: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    /// Size variants keyed by label ("Original", "Medium 800", ...).
    #[serde(default)]
    pub sizes: BTreeMap<String, SizeVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|err| Error::io(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }
    let file = File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|err| Error::io(path, err))?;
    tracing::info!(path = %path.display(), records = records.len(), "catalog written");
    Ok(())
}
