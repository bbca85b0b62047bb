//! In-memory collaborators for stage tests.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap, HashSet},
    io,
};

use crate::{
    catalog::{ImageRecord, Post, SizeVariant},
    error::{Error, Result},
    flickr::PhotoService,
    stages::download::Fetcher,
    wordpress::{Blog, MediaUpload},
};

pub fn post(id: u64, content: &str) -> Post {
    Post {
        id,
        title: format!("Post {}", id),
        link: format!("https://blog.example/?p={}", id),
        date: "2014-02-03T04:05:06".to_string(),
        content: content.to_string(),
        image_references: Vec::new(),
        upload_info: BTreeMap::new(),
    }
}

pub fn image(id: &str, labels: &[&str]) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        title: Some(format!("Photo {}", id)),
        sizes: labels
            .iter()
            .map(|label| {
                (
                    label.to_string(),
                    SizeVariant {
                        source: format!(
                            "https://live.staticflickr.com/1/{}_{}.jpg",
                            id,
                            label.replace(' ', "_")
                        ),
                        width: 800,
                        height: 600,
                    },
                )
            })
            .collect(),
        ..ImageRecord::default()
    }
}

#[derive(Default)]
pub struct FakeBlog {
    posts: Vec<Post>,
    list_calls: Cell<usize>,
    /// Listing pages at or past this offset fails.
    pub fail_from_offset: Option<usize>,
    pub uploads: RefCell<Vec<(String, u64, String)>>,
    pub updates: RefCell<Vec<(u64, String)>>,
}

impl FakeBlog {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        FakeBlog {
            posts,
            ..FakeBlog::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }
}

impl Blog for FakeBlog {
    fn list_posts(&self, offset: usize, count: usize) -> Result<Vec<Post>> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_from_offset.is_some_and(|from| offset >= from) {
            return Err(Error::io(
                "wp-json/wp/v2/posts",
                io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
            ));
        }
        Ok(self.posts.iter().skip(offset).take(count).cloned().collect())
    }

    fn upload_media(&self, upload: MediaUpload<'_>) -> Result<String> {
        self.uploads.borrow_mut().push((
            upload.filename.to_string(),
            upload.post_id,
            upload.date.to_string(),
        ));
        Ok(format!("https://blog.example/uploads/{}", upload.filename))
    }

    fn update_post(&self, id: u64, content: &str) -> Result<()> {
        self.updates.borrow_mut().push((id, content.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePhotos {
    pub images: HashMap<String, ImageRecord>,
    pub calls: Cell<usize>,
    /// Ids whose metadata resolves but whose size listing fails.
    pub sizes_unavailable: HashSet<String>,
}

impl FakePhotos {
    pub fn with_images(images: Vec<ImageRecord>) -> Self {
        FakePhotos {
            images: images.into_iter().map(|i| (i.id.clone(), i)).collect(),
            ..FakePhotos::default()
        }
    }

    fn lookup(&self, photo_id: &str) -> Result<&ImageRecord> {
        self.calls.set(self.calls.get() + 1);
        self.images.get(photo_id).ok_or_else(|| Error::Flickr {
            code: 1,
            message: format!("Photo \"{}\" not found", photo_id),
        })
    }
}

impl PhotoService for FakePhotos {
    fn photo_info(&self, photo_id: &str) -> Result<ImageRecord> {
        Ok(ImageRecord {
            sizes: BTreeMap::new(),
            ..self.lookup(photo_id)?.clone()
        })
    }

    fn photo_sizes(&self, photo_id: &str) -> Result<BTreeMap<String, SizeVariant>> {
        let image = self.lookup(photo_id)?;
        if self.sizes_unavailable.contains(photo_id) {
            return Err(Error::Flickr {
                code: 2,
                message: "Permission denied".to_string(),
            });
        }
        Ok(image.sizes.clone())
    }
}

#[derive(Default)]
pub struct FakeFetcher {
    pub calls: RefCell<Vec<String>>,
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(url.to_string());
        Ok(url.as_bytes().to_vec())
    }
}
