//! WordPress REST client.

use std::collections::BTreeMap;

use reqwest::{
    blocking::Client,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    StatusCode,
};
use serde::Deserialize;
use url::Url;

use crate::{
    catalog::Post,
    config::Settings,
    error::{Error, Result},
};

/// A file bound for the media library, attached to the post it appears in.
#[derive(Debug)]
pub struct MediaUpload<'a> {
    pub filename: &'a str,
    pub content: Vec<u8>,
    pub post_id: u64,
    pub date: &'a str,
}

/// The blog operations the stages need.
pub trait Blog {
    /// Up to `count` posts starting at `offset`. An empty page means there
    /// are no more posts.
    fn list_posts(&self, offset: usize, count: usize) -> Result<Vec<Post>>;

    /// Uploads a media file and returns its public URL.
    fn upload_media(&self, upload: MediaUpload<'_>) -> Result<String>;

    fn update_post(&self, id: u64, content: &str) -> Result<()>;
}

pub struct WordPressClient {
    base: Url,
    username: String,
    password: String,
    client: Client,
}

#[derive(Deserialize)]
struct RestText {
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    rendered: String,
}

impl RestText {
    fn into_text(self) -> String {
        self.raw.unwrap_or(self.rendered)
    }
}

#[derive(Deserialize)]
struct RestPost {
    id: u64,
    #[serde(default)]
    date: String,
    #[serde(default)]
    link: String,
    title: RestText,
    content: RestText,
}

#[derive(Deserialize)]
struct RestMedia {
    source_url: String,
}

impl WordPressClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(WordPressClient {
            base,
            username: username.to_string(),
            password: password.to_string(),
            client: Client::new(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.require(&settings.wordpress_url, "wordpress_url")?,
            settings.require(&settings.wordpress_username, "wordpress_username")?,
            settings.require(&settings.wordpress_password, "wordpress_password")?,
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join("wp-json/wp/v2/")?.join(path)?)
    }
}

impl Blog for WordPressClient {
    fn list_posts(&self, offset: usize, count: usize) -> Result<Vec<Post>> {
        let url = self.endpoint("posts")?;
        tracing::debug!(%url, offset, count, "listing posts");
        let posts: Vec<RestPost> = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .query(&[
                ("context", "edit".to_string()),
                ("per_page", count.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(posts
            .into_iter()
            .map(|post| Post {
                id: post.id,
                title: post.title.into_text(),
                link: post.link,
                date: post.date,
                content: post.content.into_text(),
                image_references: Vec::new(),
                upload_info: BTreeMap::new(),
            })
            .collect())
    }

    fn upload_media(&self, upload: MediaUpload<'_>) -> Result<String> {
        let mut url = self.endpoint("media")?;
        url.query_pairs_mut()
            .append_pair("post", &upload.post_id.to_string());
        if !upload.date.is_empty() {
            url.query_pairs_mut().append_pair("date", upload.date);
        }
        tracing::debug!(
            %url,
            filename = upload.filename,
            bytes = upload.content.len(),
            "uploading media"
        );
        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, content_type(upload.filename))
            .header(
                CONTENT_DISPOSITION,
                format!(
                    "attachment; filename*=UTF-8''{}",
                    urlencoding::encode(upload.filename)
                ),
            )
            .body(upload.content)
            .send()?;
        if response.status() != StatusCode::CREATED {
            return Err(Error::UploadStatus {
                filename: upload.filename.to_string(),
                status: response.status(),
            });
        }
        let media: RestMedia = response.json()?;
        Ok(media.source_url)
    }

    fn update_post(&self, id: u64, content: &str) -> Result<()> {
        let url = self.endpoint(&format!("posts/{}", id))?;
        tracing::debug!(%url, "updating post");
        self.client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&serde_json::json!({ "content": content }))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

fn content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn client(server: &mockito::Server) -> WordPressClient {
        WordPressClient::new(&server.url(), "editor", "app-password").unwrap()
    }

    #[test]
    fn lists_posts_with_raw_content() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/wp-json/wp/v2/posts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("context".into(), "edit".into()),
                Matcher::UrlEncoded("per_page".into(), "50".into()),
                Matcher::UrlEncoded("offset".into(), "100".into()),
            ]))
            .match_header("authorization", Matcher::Regex("^Basic ".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 5, "date": "2010-01-02T03:04:05", "link": "https://blog.example/p5",
                     "title": {"raw": "Raw title", "rendered": "Rendered title"},
                     "content": {"rendered": "<p>body</p>"}}]"#,
            )
            .create();

        let posts = client(&server).list_posts(100, 50).unwrap();
        mock.assert();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 5);
        assert_eq!(posts[0].title, "Raw title");
        assert_eq!(posts[0].content, "<p>body</p>");
        assert_eq!(posts[0].date, "2010-01-02T03:04:05");
    }

    #[test]
    fn upload_returns_source_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/wp-json/wp/v2/media")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("post".into(), "9".into()),
                Matcher::UrlEncoded("date".into(), "2011-05-06T07:08:09".into()),
            ]))
            .match_header("content-type", "image/jpeg")
            .match_header("content-disposition", "attachment; filename*=UTF-8''123_800.jpg")
            .match_body("jpeg bytes")
            .with_status(201)
            .with_body(r#"{"id": 77, "source_url": "https://blog.example/uploads/123_800.jpg"}"#)
            .create();

        let url = client(&server)
            .upload_media(MediaUpload {
                filename: "123_800.jpg",
                content: b"jpeg bytes".to_vec(),
                post_id: 9,
                date: "2011-05-06T07:08:09",
            })
            .unwrap();
        mock.assert();
        assert_eq!(url, "https://blog.example/uploads/123_800.jpg");
    }

    #[test]
    fn upload_without_created_status_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/wp-json/wp/v2/media")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"source_url": "x"}"#)
            .create();

        let err = client(&server)
            .upload_media(MediaUpload {
                filename: "1.jpg",
                content: vec![1, 2, 3],
                post_id: 1,
                date: "",
            })
            .unwrap_err();
        assert!(matches!(err, Error::UploadStatus { status, .. } if status == StatusCode::OK));
    }

    #[test]
    fn update_posts_new_content() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/wp-json/wp/v2/posts/42")
            .match_body(Matcher::Json(serde_json::json!({"content": "<p>new</p>"})))
            .with_status(200)
            .with_body("{}")
            .create();

        client(&server).update_post(42, "<p>new</p>").unwrap();
        mock.assert();
    }

    #[test]
    fn update_failure_propagates() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/wp-json/wp/v2/posts/42")
            .with_status(403)
            .create();
        assert!(matches!(
            client(&server).update_post(42, "x"),
            Err(Error::Http(_))
        ));
    }

    #[test]
    fn base_url_keeps_subdirectory() {
        let client = WordPressClient::new("https://example.org/blog", "u", "p").unwrap();
        assert_eq!(
            client.endpoint("posts/3").unwrap().as_str(),
            "https://example.org/blog/wp-json/wp/v2/posts/3"
        );
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type("a.JPG"), "image/jpeg");
        assert_eq!(content_type("a.png"), "image/png");
        assert_eq!(content_type("noext"), "application/octet-stream");
    }
}
