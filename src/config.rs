//! Layered settings: defaults, `config.toml`, `.secrets.toml`, then `F2B_*`
//! environment variables (a `.env` file is loaded into the environment
//! first).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{Error, Result};

pub const ENV_PREFIX: &str = "F2B";
pub const SECRETS_FILE: &str = ".secrets.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub wordpress_url: Option<String>,
    #[serde(default)]
    pub wordpress_username: Option<String>,
    #[serde(default)]
    pub wordpress_password: Option<String>,
    #[serde(default)]
    pub flickr_api_key: Option<String>,
    #[serde(default)]
    pub flickr_api_secret: Option<String>,
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            wordpress_url: None,
            wordpress_username: None,
            wordpress_password: None,
            flickr_api_key: None,
            flickr_api_secret: None,
            download_dir: default_download_dir(),
        }
    }
}

impl Settings {
    /// Loads settings with `config_path` as the main file. The secrets file
    /// is looked up in the same directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "could not read .env");
            }
        }
        Self::from_sources(config_path, Environment::with_prefix(ENV_PREFIX))
    }

    fn from_sources(config_path: &Path, environment: Environment) -> Result<Self> {
        let secrets = config_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(SECRETS_FILE);
        let settings = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml).required(false))
            .add_source(File::from(secrets).format(FileFormat::Toml).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn require<'a>(&self, value: &'a Option<String>, key: &'static str) -> Result<&'a str> {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingSetting(key))
    }
}
