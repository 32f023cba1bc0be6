//! Defines the [`Frontmatter`] type and the [`extract`] function. This is a
//! deliberately narrow, line-anchored subset parser for the metadata block at
//! the top of an article source file: `key: value` lines between two `---`
//! fence lines. It does not support multi-line values, nesting, or escapes.
//! If richer metadata is ever needed, swap in a structured parser behind the
//! same [`Frontmatter`] contract; the rest of the pipeline doesn't care how
//! the fields were extracted.
//!
//! Extraction never fails. A document with no closing fence has an empty
//! metadata block, and every missing field takes its default. Deciding
//! whether a document is *usable* (non-empty `title` and `date`) is the
//! caller's concern, not this module's.

use std::sync::LazyLock;

use regex::Regex;

const FENCE: &str = "---";

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^title:\s*(.+)$").unwrap());
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^date:\s*(.+)$").unwrap());
static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^description:\s*(.+)$").unwrap());
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^image:\s*(.+)$").unwrap());
static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^tags:\s*\[(.*)\]$").unwrap());

/// The metadata declared at the top of an article source file. Missing
/// fields default rather than error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// The title of the article. Empty if the document declared none.
    pub title: String,

    /// The publication date as written, e.g. `2024-06-01`. Empty if the
    /// document declared none.
    pub date: String,

    /// A one-line description used as the feed item summary.
    pub description: String,

    /// Tags parsed from a single bracketed inline list:
    /// `tags: [a, "b", c]`.
    pub tags: Vec<String>,

    /// An optional root-relative image path, e.g. `/images/cover.png`.
    pub image: Option<String>,
}

/// Extracts the [`Frontmatter`] from the raw text of an article source file.
pub fn extract(raw: &str) -> Frontmatter {
    let (block, _) = split(raw);
    Frontmatter {
        title: value(&TITLE, block),
        date: value(&DATE, block),
        description: value(&DESCRIPTION, block),
        tags: tags(block),
        image: match value(&IMAGE, block) {
            image if image.is_empty() => None,
            image => Some(image),
        },
    }
}

/// Splits raw document text into its metadata block and the body that
/// follows. The block is the text between the opening `---` fence at the
/// start of the document and the next `---` at the start of a line. A
/// document with no opening fence, or no closing fence, has an empty block
/// and the full text as its body.
pub(crate) fn split(raw: &str) -> (&str, &str) {
    let rest = match raw.strip_prefix(FENCE) {
        Some(rest) => rest,
        None => return ("", raw),
    };
    match rest.find("\n---") {
        None => ("", raw),
        Some(offset) => {
            let block = &rest[..offset];
            // The closing fence consumes the remainder of its own line plus
            // any blank lines before the body.
            let after = &rest[offset + 1 + FENCE.len()..];
            let body = match after.find('\n') {
                Some(newline) => &after[newline + 1..],
                None => "",
            };
            (block, body.trim_start_matches('\n'))
        }
    }
}

fn value(pattern: &Regex, block: &str) -> String {
    pattern
        .captures(block)
        .map(|captures| captures[1].trim().to_owned())
        .unwrap_or_default()
}

fn tags(block: &str) -> Vec<String> {
    match TAGS.captures(block) {
        None => Vec::new(),
        Some(captures) => captures[1]
            .split(',')
            .map(|tag| {
                tag.trim()
                    .trim_matches(|quote| quote == '\'' || quote == '"')
                    .to_owned()
            })
            .filter(|tag| !tag.is_empty())
            .collect(),
    }
}
