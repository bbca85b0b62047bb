//! Flickr REST client for the two lookups the catalog needs.

use std::collections::BTreeMap;

use crypto::{digest::Digest, md5::Md5};
use reqwest::blocking::Client;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use url::Url;

use crate::{
    catalog::{ImageRecord, SizeVariant},
    config::Settings,
    error::{Error, Result},
};

pub const REST_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

pub trait PhotoService {
    /// Descriptive metadata, with no sizes filled in.
    fn photo_info(&self, photo_id: &str) -> Result<ImageRecord>;

    /// Available size variants keyed by label.
    fn photo_sizes(&self, photo_id: &str) -> Result<BTreeMap<String, SizeVariant>>;
}

pub struct FlickrClient {
    endpoint: Url,
    api_key: String,
    api_secret: String,
    client: Client,
}

#[derive(Deserialize)]
struct Content {
    #[serde(rename = "_content", default)]
    content: String,
}

#[derive(Deserialize)]
struct InfoResponse {
    photo: RawPhoto,
}

#[derive(Deserialize)]
struct RawPhoto {
    id: String,
    #[serde(default)]
    title: Option<Content>,
    #[serde(default)]
    description: Option<Content>,
    #[serde(default)]
    owner: Option<RawOwner>,
    #[serde(default)]
    dates: Option<RawDates>,
    #[serde(default)]
    urls: Option<RawUrls>,
}

#[derive(Deserialize)]
struct RawOwner {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    nsid: Option<String>,
}

#[derive(Deserialize)]
struct RawDates {
    #[serde(default)]
    taken: Option<String>,
}

#[derive(Deserialize)]
struct RawUrls {
    #[serde(default)]
    url: Vec<RawUrl>,
}

#[derive(Deserialize)]
struct RawUrl {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(rename = "_content")]
    content: String,
}

#[derive(Deserialize)]
struct SizesResponse {
    sizes: RawSizes,
}

#[derive(Deserialize)]
struct RawSizes {
    size: Vec<RawSize>,
}

#[derive(Deserialize)]
struct RawSize {
    label: String,
    source: String,
    #[serde(deserialize_with = "number_or_string")]
    width: u32,
    #[serde(deserialize_with = "number_or_string")]
    height: u32,
}

/// Flickr reports dimensions as numbers for some sizes and strings for
/// others.
fn number_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Dimension {
        Number(u32),
        Text(String),
    }
    match Dimension::deserialize(deserializer)? {
        Dimension::Number(n) => Ok(n),
        Dimension::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn non_empty(content: Option<Content>) -> Option<String> {
    content.map(|c| c.content).filter(|c| !c.is_empty())
}

impl From<RawPhoto> for ImageRecord {
    fn from(photo: RawPhoto) -> Self {
        ImageRecord {
            id: photo.id,
            title: non_empty(photo.title),
            description: non_empty(photo.description),
            owner: photo.owner.and_then(|o| o.username.or(o.nsid)),
            date_taken: photo.dates.and_then(|d| d.taken),
            page_url: photo.urls.and_then(|u| {
                u.url
                    .into_iter()
                    .find(|url| url.kind == "photopage")
                    .map(|url| url.content)
            }),
            sizes: BTreeMap::new(),
        }
    }
}

impl FlickrClient {
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self> {
        Self::with_endpoint(REST_ENDPOINT, api_key, api_secret)
    }

    pub fn with_endpoint(endpoint: &str, api_key: &str, api_secret: &str) -> Result<Self> {
        Ok(FlickrClient {
            endpoint: Url::parse(endpoint)?,
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            client: Client::new(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.require(&settings.flickr_api_key, "flickr_api_key")?,
            settings.require(&settings.flickr_api_secret, "flickr_api_secret")?,
        )
    }

    /// `api_sig`: MD5 over the secret followed by every parameter name and
    /// value, sorted by name.
    fn sign(&self, params: &BTreeMap<&str, String>) -> String {
        let mut digest = Md5::new();
        digest.input_str(&self.api_secret);
        for (name, value) in params {
            digest.input_str(name);
            digest.input_str(value);
        }
        digest.result_str()
    }

    fn call<T: DeserializeOwned>(&self, method: &str, photo_id: &str) -> Result<T> {
        let mut params = BTreeMap::new();
        params.insert("api_key", self.api_key.clone());
        params.insert("format", "json".to_string());
        params.insert("method", method.to_string());
        params.insert("nojsoncallback", "1".to_string());
        params.insert("photo_id", photo_id.to_string());
        let signature = self.sign(&params);

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("api_sig", &signature);
        tracing::debug!(method, photo_id, "flickr call");

        let response: Value = self.client.get(url).send()?.error_for_status()?.json()?;
        if response.get("stat").and_then(Value::as_str) != Some("ok") {
            return Err(Error::Flickr {
                code: response.get("code").and_then(Value::as_i64).unwrap_or(-1),
                message: response
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown failure")
                    .to_string(),
            });
        }
        Ok(serde_json::from_value(response)?)
    }
}

impl PhotoService for FlickrClient {
    fn photo_info(&self, photo_id: &str) -> Result<ImageRecord> {
        let info: InfoResponse = self.call("flickr.photos.getInfo", photo_id)?;
        Ok(info.photo.into())
    }

    fn photo_sizes(&self, photo_id: &str) -> Result<BTreeMap<String, SizeVariant>> {
        let sizes: SizesResponse = self.call("flickr.photos.getSizes", photo_id)?;
        Ok(sizes
            .sizes
            .size
            .into_iter()
            .map(|s| {
                (
                    s.label,
                    SizeVariant {
                        source: s.source,
                        width: s.width,
                        height: s.height,
                    },
                )
            })
            .collect())
    }
}
