use std::path::PathBuf;

/// Errors produced by the migration stages and their collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("missing setting {0}")]
    MissingSetting(&'static str),

    #[error("flickr error {code}: {message}")]
    Flickr { code: i64, message: String },

    #[error("upload of {filename} returned {status}, expected 201 Created")]
    UploadStatus {
        filename: String,
        status: reqwest::StatusCode,
    },

    #[error("confirmation not given, no posts were changed")]
    NotConfirmed,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
