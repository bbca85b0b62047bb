use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// The download directory. Files are named by the caller and never
/// overwritten.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.path(filename).exists()
    }

    pub fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.path(filename);
        fs::read(&path).map_err(|err| Error::io(path, err))
    }

    /// Writes `content` unless the file already exists. Returns whether the
    /// file was written.
    pub fn write_new(&self, filename: &str, content: &[u8]) -> Result<bool> {
        fs::create_dir_all(&self.dir).map_err(|err| Error::io(&self.dir, err))?;
        let path = self.path(filename);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(content)
                    .map_err(|err| Error::io(&path, err))?;
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(err) => Err(Error::io(path, err)),
        }
    }
}
