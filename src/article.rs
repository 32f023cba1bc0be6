//! Defines the [`Article`] type and the logic for loading articles from the
//! content directory into memory, plus [`Store`], an explicit cache that
//! avoids re-reading the directory for every output built within a process.

use std::fs::read_dir;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::frontmatter;

const MDX_EXTENSION: &str = ".mdx";

/// A single article, parsed from an `.mdx` source file. The slug is the
/// file name minus its extension and determines the article's canonical
/// URL (`{origin}/articles/{slug}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub slug: String,
    pub title: String,

    /// The publication date as written in the frontmatter. Kept as a string
    /// because articles sort lexicographically on it; it is guaranteed to
    /// parse via [`parse_date`].
    pub date: String,

    pub description: String,
    pub tags: Vec<String>,

    /// Optional root-relative path to the article's cover image.
    pub image: Option<String>,

    /// The raw body text following the frontmatter block.
    pub body: String,
}

impl Article {
    /// Builds an [`Article`] from a slug and the raw text of its source
    /// file. Returns `None` when the document is unusable for syndication:
    /// missing `title` or `date`, or a `date` that isn't a calendar date.
    /// Malformed documents are a content-authoring concern, not an error;
    /// drafts routinely omit these fields.
    pub fn from_raw(slug: impl Into<String>, raw: &str) -> Option<Article> {
        let metadata = frontmatter::extract(raw);
        if metadata.title.is_empty()
            || metadata.date.is_empty()
            || parse_date(&metadata.date).is_err()
        {
            return None;
        }
        let (_, body) = frontmatter::split(raw);
        Some(Article {
            slug: slug.into(),
            title: metadata.title,
            date: metadata.date,
            description: metadata.description,
            tags: metadata.tags,
            image: metadata.image,
            body: body.to_owned(),
        })
    }
}

/// Parses an article date. Dates are ISO `YYYY-MM-DD`; month-granularity
/// `YYYY-MM` dates are accepted and pinned to the first of the month. Both
/// forms sort correctly under the lexicographic ordering used for feeds.
pub fn parse_date(date: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d"))
}

/// Reads every `.mdx` file directly under `directory` (non-recursive) and
/// returns the usable articles sorted by date descending, ties broken by
/// slug so the ordering is deterministic across platforms. Documents
/// missing required metadata are skipped silently; I/O failures propagate,
/// since they indicate an environment problem rather than a content one.
pub fn load_articles(directory: &Path) -> io::Result<Vec<Article>> {
    let mut articles = Vec::new();
    for result in read_dir(directory)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if !file_name.ends_with(MDX_EXTENSION) {
            continue;
        }
        let slug = file_name.trim_end_matches(MDX_EXTENSION);
        let contents = std::fs::read_to_string(entry.path())?;
        match Article::from_raw(slug, &contents) {
            Some(article) => articles.push(article),
            None => {
                debug!(file = %file_name, "skipping article without usable title/date")
            }
        }
    }

    articles.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    Ok(articles)
}

/// An explicit cache of loaded articles. Holding the cache in a value that
/// callers pass around, rather than in module-level state, keeps reloads
/// under the caller's control so tests can reset it deterministically.
pub struct Store {
    directory: PathBuf,
    cached: Option<Vec<Article>>,
}

impl Store {
    /// Creates a store over the given content directory. Nothing is read
    /// until the first call to [`Store::articles`].
    pub fn new(directory: impl Into<PathBuf>) -> Store {
        Store {
            directory: directory.into(),
            cached: None,
        }
    }

    /// Returns the articles, loading them from disk on first use and from
    /// the cache afterwards.
    pub fn articles(&mut self) -> io::Result<&[Article]> {
        let articles = match self.cached.take() {
            Some(articles) => articles,
            None => {
                let articles = load_articles(&self.directory)?;
                debug!(count = articles.len(), "loaded articles");
                articles
            }
        };
        Ok(self.cached.insert(articles).as_slice())
    }

    /// Drops the cached articles; the next [`Store::articles`] call re-reads
    /// the content directory.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
