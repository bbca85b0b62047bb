//! CSV side tables consulted by the upload stage.

use std::{
    collections::{BTreeSet, HashMap},
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Post ids listed one per row. Rows that are not a number (a header, a
/// comment) are ignored.
pub fn load_excludes(path: &Path) -> Result<BTreeSet<u64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut excludes = BTreeSet::new();
    for record in reader.records() {
        let record = record?;
        match record.get(0).map(str::trim).and_then(|f| f.parse().ok()) {
            Some(id) => {
                excludes.insert(id);
            }
            None => tracing::debug!(row = ?record, "ignoring exclusion row"),
        }
    }
    Ok(excludes)
}

/// Local filename to remote URL for files already in the media library.
///
/// When backed by a file, new entries are appended to it as they are
/// recorded.
#[derive(Debug, Default)]
pub struct UploadMemo {
    entries: HashMap<String, String>,
    path: Option<PathBuf>,
}

impl UploadMemo {
    pub fn open(path: &Path) -> Result<Self> {
        let mut entries = HashMap::new();
        if path.exists() {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(path)?;
            for record in reader.records() {
                let record = record?;
                if let (Some(filename), Some(url)) = (record.get(0), record.get(1)) {
                    entries.insert(filename.trim().to_string(), url.trim().to_string());
                }
            }
        }
        tracing::info!(path = %path.display(), entries = entries.len(), "loaded upload memo");
        Ok(UploadMemo {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, filename: &str, url: &str) -> Result<()> {
        if let Some(path) = &self.path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| Error::io(path, err))?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record([filename, url])?;
            writer.flush().map_err(|err| Error::io(path, err))?;
        }
        self.entries.insert(filename.to_string(), url.to_string());
        Ok(())
    }
}
