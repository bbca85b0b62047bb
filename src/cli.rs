use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Moves images embedded from Flickr into a WordPress media library.
#[derive(Debug, Parser)]
#[command(name = "flickr2blog", version)]
pub struct Cli {
    /// Settings file; `.secrets.toml` is read from the same directory
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// More output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List blog posts that mention flickr.com
    #[command(name = "catalog_posts")]
    CatalogPosts {
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "posts.json")]
        output: PathBuf,
    },

    /// Find the Flickr links in each cataloged post
    #[command(name = "process_posts")]
    ProcessPosts {
        #[arg(long = "post_catalog", default_value = "posts.json")]
        post_catalog: PathBuf,
        #[arg(long, default_value = "posts_with_images.json")]
        output: PathBuf,
    },

    /// Fetch metadata and sizes for every linked photo
    #[command(name = "catalog_images")]
    CatalogImages {
        #[arg(long = "post_catalog", default_value = "posts_with_images.json")]
        post_catalog: PathBuf,
        #[arg(long, default_value = "images.json")]
        output: PathBuf,
    },

    /// Download medium and original copies of every cataloged photo
    #[command(name = "download_images")]
    DownloadImages {
        #[arg(long = "image_catalog", default_value = "images.json")]
        image_catalog: PathBuf,
    },

    /// Upload downloaded photos to the WordPress media library
    #[command(name = "upload_to_wp")]
    UploadToWp {
        #[arg(long = "post_catalog", default_value = "posts_with_images.json")]
        post_catalog: PathBuf,
        #[arg(long = "new_post_catalog", default_value = "posts_uploaded.json")]
        new_post_catalog: PathBuf,
        #[arg(long = "image_catalog", default_value = "images.json")]
        image_catalog: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        /// CSV of post ids to leave alone
        #[arg(long)]
        excludes: Option<PathBuf>,
        /// CSV of filename,url pairs already in the media library
        #[arg(long = "already_uploaded")]
        already_uploaded: Option<PathBuf>,
    },

    /// Replace Flickr links in post bodies with the uploaded copies
    #[command(name = "update_posts")]
    UpdatePosts {
        #[arg(long = "post_catalog", default_value = "posts_uploaded.json")]
        post_catalog: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// Default log filter for the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_underscored_subcommands_and_flags() {
        let cli = Cli::try_parse_from([
            "flickr2blog",
            "upload_to_wp",
            "--post_catalog",
            "in.json",
            "--limit",
            "3",
            "--already_uploaded",
            "memo.csv",
        ])
        .unwrap();
        match cli.command {
            Command::UploadToWp {
                post_catalog,
                new_post_catalog,
                limit,
                excludes,
                already_uploaded,
                ..
            } => {
                assert_eq!(post_catalog, PathBuf::from("in.json"));
                assert_eq!(new_post_catalog, PathBuf::from("posts_uploaded.json"));
                assert_eq!(limit, Some(3));
                assert_eq!(excludes, None);
                assert_eq!(already_uploaded, Some(PathBuf::from("memo.csv")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn verbosity_maps_to_level() {
        let cli = Cli::try_parse_from(["flickr2blog", "-vv", "download_images"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
        let cli = Cli::try_parse_from(["flickr2blog", "download_images", "-q"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
    }
}
