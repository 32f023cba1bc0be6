//! Exports the [`build_site`] function which stitches together the
//! high-level steps of producing the syndication outputs: loading articles
//! ([`crate::article`]), generating the RSS feed ([`crate::feed`]), and
//! generating the sitemap ([`crate::sitemap`]).

use std::fmt;
use std::fs::File;
use std::path::Path;

use chrono::{Datelike, Utc};
use tracing::info;

use crate::article::Store;
use crate::config::Config;
use crate::feed::{self, Error as FeedError, FeedConfig};
use crate::sitemap;

/// Builds the site's syndication outputs from a [`Config`] object, writing
/// `rss.xml` and `sitemap.xml` into `output_directory`. Articles missing
/// required metadata are skipped; failures reading the content directory
/// itself propagate, since an empty or partial feed would silently mask a
/// deployment problem.
pub fn build_site(config: &Config, output_directory: &Path) -> Result<()> {
    std::fs::create_dir_all(output_directory)?;

    let mut store = Store::new(&config.content_directory);
    let articles = store.articles()?;
    info!(count = articles.len(), "building syndication outputs");

    feed::write_feed(
        feed_config(config),
        articles,
        File::create(output_directory.join("rss.xml"))?,
    )?;

    sitemap::write_sitemap(
        &config.origin,
        &config.routes,
        articles,
        File::create(output_directory.join("sitemap.xml"))?,
    )?;

    Ok(())
}

/// Assembles a [`FeedConfig`] from the site [`Config`]. The copyright year
/// is computed here, keeping the feed assembly itself deterministic.
fn feed_config(config: &Config) -> FeedConfig {
    FeedConfig {
        title: config.title.clone(),
        description: config.description.clone(),
        origin: config.origin.clone(),
        language: config.language.clone(),
        image: config.image.clone(),
        favicon: config.favicon.clone(),
        copyright: format!(
            "All rights reserved {}, {}",
            Utc::now().year(),
            config.author.name
        ),
        author: config.author.clone(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the site outputs.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors while generating the feed.
    Feed(FeedError),

    /// Returned for I/O errors reading content or creating output files.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
