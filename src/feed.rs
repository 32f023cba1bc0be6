//! Support for creating RSS feeds from a list of articles.

use std::fmt;
use std::io::Write;

use chrono::{NaiveTime, TimeZone, Utc};
use rss::extension::atom::{AtomExtension, Link};
use rss::{Category, Channel, Enclosure, Guid, Image, Item};
use url::Url;

use crate::article::{self, Article};
use crate::config::Author;
use crate::degrade;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub description: String,
    pub origin: Url,
    pub language: String,

    /// Root-relative path to the channel image.
    pub image: Option<String>,

    /// Root-relative path to the favicon.
    pub favicon: Option<String>,

    /// The full copyright string, including the year. Computed by the
    /// caller so that feed assembly itself stays deterministic.
    pub copyright: String,

    pub author: Author,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Article`]s and writes the result to a [`std::io::Write`]. This function
/// takes ownership of the provided [`FeedConfig`]. Calling it twice against
/// the same inputs produces byte-identical output.
pub fn write_feed<W: Write>(
    config: FeedConfig,
    articles: &[Article],
    w: W,
) -> Result<()> {
    channel(config, articles)?.write_to(w)?;
    Ok(())
}

fn channel(config: FeedConfig, articles: &[Article]) -> Result<Channel> {
    let items = items(&config, articles)?;
    let image = match &config.image {
        Some(path) => Some(Image {
            url: config.origin.join(path)?.to_string(),
            title: config.title.clone(),
            link: config.origin.to_string(),
            width: None,
            height: None,
            description: None,
        }),
        None => None,
    };

    let mut links = vec![Link {
        href: config.origin.join("rss.xml")?.to_string(),
        rel: "self".to_owned(),
        hreflang: None,
        mime_type: Some("application/rss+xml".to_owned()),
        title: None,
        length: None,
    }];
    if let Some(favicon) = &config.favicon {
        links.push(Link {
            href: config.origin.join(favicon)?.to_string(),
            rel: "icon".to_owned(),
            hreflang: None,
            mime_type: None,
            title: None,
            length: None,
        });
    }

    Ok(Channel {
        items,
        title: config.title,
        link: config.origin.to_string(),
        description: config.description,
        language: Some(config.language),
        copyright: Some(config.copyright),
        managing_editor: Some(config.author.name),
        image,
        atom_ext: Some(AtomExtension { links }),
        ..Default::default()
    })
}

fn items(config: &FeedConfig, articles: &[Article]) -> Result<Vec<Item>> {
    let mut items = Vec::with_capacity(articles.len());

    for article in articles {
        let canonical = config
            .origin
            .join(&format!("articles/{}", article.slug))?;

        // Articles only carry a calendar date; pubDate wants a full RFC 2822
        // timestamp, so the date is pinned to midnight UTC.
        let date = article::parse_date(&article.date)?;
        let pub_date = Utc
            .from_utc_datetime(&date.and_time(NaiveTime::MIN))
            .to_rfc2822();

        let enclosure = match &article.image {
            Some(image) => Some(Enclosure {
                url: config.origin.join(image)?.to_string(),
                length: "0".to_owned(),
                mime_type: image_mime_type(image).to_owned(),
            }),
            None => None,
        };

        items.push(Item {
            title: Some(article.title.clone()),
            link: Some(canonical.to_string()),
            guid: Some(Guid {
                value: canonical.to_string(),
                permalink: true,
            }),
            description: Some(article.description.clone()),
            content: Some(degrade::to_html(&config.origin, &article.body)),
            pub_date: Some(pub_date),
            categories: article
                .tags
                .iter()
                .map(|tag| Category {
                    name: tag.clone(),
                    domain: None,
                })
                .collect(),
            enclosure,
            ..Default::default()
        });
    }
    Ok(items)
}

fn image_mime_type(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include RSS
/// serialization, URL, and date parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is an RSS serialization error.
    Rss(rss::Error),

    /// Returned when there is a problem building item URLs.
    UrlParse(url::ParseError),

    /// Returned when there is an issue parsing an article's date. Articles
    /// loaded through [`crate::article`] are pre-validated, so this only
    /// fires for hand-constructed inputs.
    DateParse(chrono::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Rss(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::DateParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Rss(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::DateParse(err) => Some(err),
        }
    }
}

impl From<rss::Error> for Error {
    /// Converts [`rss::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: rss::Error) -> Error {
        Error::Rss(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts [`chrono::ParseError`]s into [`Error`]. This allows us to
    /// use the `?` operator in fallible feed operations.
    fn from(err: chrono::ParseError) -> Error {
        Error::DateParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_config() -> FeedConfig {
        FeedConfig {
            title: "Example".to_owned(),
            description: "An example site".to_owned(),
            origin: Url::parse("https://example.org").unwrap(),
            language: "en".to_owned(),
            image: Some("/og.png".to_owned()),
            favicon: Some("/favicon.ico".to_owned()),
            copyright: "All rights reserved 2026, Jo Bloggs".to_owned(),
            author: Author {
                name: "Jo Bloggs".to_owned(),
                link: Some("https://example.org".to_owned()),
            },
        }
    }

    fn test_article(slug: &str, date: &str) -> Article {
        Article {
            slug: slug.to_owned(),
            title: format!("Title of {slug}"),
            date: date.to_owned(),
            description: "summary".to_owned(),
            tags: vec!["rust".to_owned(), "testing".to_owned()],
            image: Some("/images/cover.png".to_owned()),
            body: "# Heading\n\nBody text\n".to_owned(),
        }
    }

    fn render(config: FeedConfig, articles: &[Article]) -> String {
        let mut buffer = Vec::new();
        write_feed(config, articles, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_channel_metadata() -> Result<()> {
        let channel = channel(test_config(), &[])?;
        assert_eq!(channel.title, "Example");
        assert_eq!(channel.link, "https://example.org/");
        assert_eq!(channel.language.as_deref(), Some("en"));
        assert_eq!(
            channel.copyright.as_deref(),
            Some("All rights reserved 2026, Jo Bloggs")
        );
        assert_eq!(
            channel.image.as_ref().map(|image| image.url.as_str()),
            Some("https://example.org/og.png")
        );
        Ok(())
    }

    #[test]
    fn test_item_fields() -> Result<()> {
        let articles = vec![test_article("hello", "2024-06-01")];
        let channel = channel(test_config(), &articles)?;
        let item = &channel.items[0];
        assert_eq!(item.title.as_deref(), Some("Title of hello"));
        assert_eq!(
            item.link.as_deref(),
            Some("https://example.org/articles/hello")
        );
        assert_eq!(
            item.guid.as_ref().map(|guid| guid.value.as_str()),
            item.link.as_deref(),
            "guid matches the canonical link"
        );
        assert!(item
            .content
            .as_deref()
            .unwrap()
            .contains("<h1>Heading</h1>"));
        assert_eq!(item.categories.len(), 2);
        assert_eq!(
            item.enclosure.as_ref().map(|e| e.url.as_str()),
            Some("https://example.org/images/cover.png")
        );
        assert_eq!(
            item.enclosure.as_ref().map(|e| e.mime_type.as_str()),
            Some("image/png")
        );
        assert_eq!(
            item.pub_date.as_deref(),
            Some("Sat, 1 Jun 2024 00:00:00 +0000")
        );
        Ok(())
    }

    #[test]
    fn test_items_sorted_order_is_preserved() {
        let articles = vec![
            test_article("newest", "2024-06-01"),
            test_article("middle", "2024-01-01"),
            test_article("oldest", "2023-05-05"),
        ];
        let xml = render(test_config(), &articles);
        let newest = xml.find("articles/newest").unwrap();
        let middle = xml.find("articles/middle").unwrap();
        let oldest = xml.find("articles/oldest").unwrap();
        assert!(newest < middle && middle < oldest);
    }

    #[test]
    fn test_write_feed_is_deterministic() {
        let articles = vec![test_article("hello", "2024-06-01")];
        let first = render(test_config(), &articles);
        let second = render(test_config(), &articles);
        assert_eq!(first, second);
    }

    #[test]
    fn test_month_granularity_date() -> Result<()> {
        let articles = vec![test_article("monthly", "2023-05")];
        let channel = channel(test_config(), &articles)?;
        assert_eq!(
            channel.items[0].pub_date.as_deref(),
            Some("Mon, 1 May 2023 00:00:00 +0000")
        );
        Ok(())
    }
}
