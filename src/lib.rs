pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod flickr;
pub mod fs_tools;
pub mod memo;
pub mod processing;
pub mod stages;
pub mod wordpress;

use std::io;

use catalog::{ImageRecord, Post};
use cli::{Cli, Command};
use config::Settings;
use flickr::FlickrClient;
use fs_tools::LocalStore;
use memo::UploadMemo;
use processing::LinkExtractor;
use stages::{download::HttpFetcher, upload::UploadOptions};
use wordpress::WordPressClient;

pub use error::{Error, Result};

pub fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::load(&cli.config)?;
    match &cli.command {
        Command::CatalogPosts {
            offset,
            limit,
            output,
        } => {
            let blog = WordPressClient::from_settings(&settings)?;
            let posts = stages::discover::catalog_posts(&blog, *offset, *limit)?;
            catalog::save(output, &posts)
        }
        Command::ProcessPosts {
            post_catalog,
            output,
        } => {
            let posts: Vec<Post> = catalog::load(post_catalog)?;
            let posts = stages::extract::process_posts(&LinkExtractor::new()?, posts);
            catalog::save(output, &posts)
        }
        Command::CatalogImages {
            post_catalog,
            output,
        } => {
            let service = FlickrClient::from_settings(&settings)?;
            let posts: Vec<Post> = catalog::load(post_catalog)?;
            let images = stages::images::catalog_images(&service, &posts);
            catalog::save(output, &images)
        }
        Command::DownloadImages { image_catalog } => {
            let images: Vec<ImageRecord> = catalog::load(image_catalog)?;
            let store = LocalStore::new(&settings.download_dir);
            stages::download::download_images(&HttpFetcher::default(), &store, &images)?;
            Ok(())
        }
        Command::UploadToWp {
            post_catalog,
            new_post_catalog,
            image_catalog,
            limit,
            excludes,
            already_uploaded,
        } => {
            let blog = WordPressClient::from_settings(&settings)?;
            let mut posts: Vec<Post> = catalog::load(post_catalog)?;
            let images: Vec<ImageRecord> = catalog::load(image_catalog)?;
            let options = UploadOptions {
                limit: *limit,
                excludes: match excludes {
                    Some(path) => memo::load_excludes(path)?,
                    None => Default::default(),
                },
            };
            let mut memo = match already_uploaded {
                Some(path) => UploadMemo::open(path)?,
                None => UploadMemo::default(),
            };
            let store = LocalStore::new(&settings.download_dir);
            stages::upload::upload_to_blog(
                &blog, &store, &mut posts, &images, &mut memo, &options,
            )?;
            catalog::save(new_post_catalog, &posts)
        }
        Command::UpdatePosts {
            post_catalog,
            limit,
        } => {
            let blog = WordPressClient::from_settings(&settings)?;
            let posts: Vec<Post> = catalog::load(post_catalog)?;
            let count = limit.map_or(posts.len(), |limit| limit.min(posts.len()));
            stages::rewrite::confirm(&mut io::stdin().lock(), &mut io::stdout(), count)?;
            stages::rewrite::update_posts(&blog, &posts, *limit)?;
            Ok(())
        }
    }
}
