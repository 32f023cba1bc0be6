//! Degrades MDX article bodies into feed-safe HTML. Feed readers can't
//! execute the interactive components embedded in article sources, so
//! instead of a real Markdown engine this module applies a fixed sequence
//! of text rewrites: component stripping, URL absolutization, and a small
//! Markdown subset (headers, emphasis, links, code, lists, paragraphs).
//!
//! The transformation is total: every input produces some output, and
//! anything outside the rule set (tables, blockquotes, nested components)
//! is passed through as literal text or dropped. Lossy on purpose.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::frontmatter;

/// `<Image src=".." alt=".."/>` components carry real content, so they are
/// rewritten to plain `<img>` tags rather than dropped with the rest.
static IMAGE_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<Image[^>]*src="([^"]*)"[^>]*alt="([^"]*)"[^>]*/>"#).unwrap()
});
static IMAGE_ORPHAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Image[^>]*/>").unwrap());
static VIDEO_ORPHAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Video[^>]*/>").unwrap());
static COMPONENT_PAIRED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Z][a-zA-Z]*[^>]*>[\s\S]*?</[A-Z][a-zA-Z]*>").unwrap()
});
static COMPONENT_SELF_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Z][a-zA-Z]*[^>]*/>").unwrap());

static SRC_ROOT_RELATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="/([^"]*)""#).unwrap());
static HREF_ROOT_RELATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="/([^"]*)""#).unwrap());

static HEADER_3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### (.+)$").unwrap());
static HEADER_2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").unwrap());
static HEADER_1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\w*\n([\s\S]*?)```").unwrap());
static CODE_INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- (.+)$").unwrap());
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").unwrap());
static LIST_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<li>.*</li>\n?)+").unwrap());

/// Converts an article body to feed-safe HTML. The `origin` is used to
/// rewrite root-relative `src`/`href` attributes into absolute URLs. A
/// leading frontmatter block, if present, is stripped first. This function
/// never fails; unrecognized constructs degrade rather than error.
pub fn to_html(origin: &Url, raw: &str) -> String {
    let site = origin.as_str().trim_end_matches('/');

    let (_, body) = frontmatter::split(raw);

    // Custom components. `Image` is salvaged; everything else uppercase
    // initial is removed, paired tags together with their inner content.
    let html =
        IMAGE_COMPONENT.replace_all(body, r#"<img src="${1}" alt="${2}" />"#);
    let html = IMAGE_ORPHAN.replace_all(&html, "");
    let html = VIDEO_ORPHAN.replace_all(&html, "");
    let html = COMPONENT_PAIRED.replace_all(&html, "");
    let html = COMPONENT_SELF_CLOSING.replace_all(&html, "");

    // Root-relative URLs become absolute so they resolve inside readers.
    let html = SRC_ROOT_RELATIVE
        .replace_all(&html, format!(r#"src="{site}/${{1}}""#).as_str());
    let html = HREF_ROOT_RELATIVE
        .replace_all(&html, format!(r#"href="{site}/${{1}}""#).as_str());

    // The Markdown subset. Later rewrites operate on earlier output, so the
    // order matters: fenced code before inline code, bold before italic.
    let html = HEADER_3.replace_all(&html, "<h3>${1}</h3>");
    let html = HEADER_2.replace_all(&html, "<h2>${1}</h2>");
    let html = HEADER_1.replace_all(&html, "<h1>${1}</h1>");
    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}</em>");
    let html = LINK.replace_all(&html, r#"<a href="${2}">${1}</a>"#);
    let html = CODE_FENCE.replace_all(&html, "<pre><code>${1}</code></pre>");
    let html = CODE_INLINE.replace_all(&html, "<code>${1}</code>");
    let html = LIST_ITEM.replace_all(&html, "<li>${1}</li>");

    // Blank-line-separated blocks become paragraph boundaries, and
    // contiguous runs of list items get a single wrapping `<ul>`.
    let html = PARAGRAPH_BREAK.replace_all(&html, "</p><p>");
    let html = LIST_RUN.replace_all(&html, "<ul>${0}</ul>");

    let html = if html.starts_with('<') {
        html.into_owned()
    } else {
        format!("<p>{html}</p>")
    };
    html.trim().to_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    fn degrade(raw: &str) -> String {
        to_html(&Url::parse("https://example.org").unwrap(), raw)
    }

    #[test]
    fn test_header_and_paragraph() {
        let html = degrade("# Hello\n\nWorld");
        assert!(html.contains("<h1>Hello</h1>"), "got: {html}");
        assert!(html.contains("<p>World"), "got: {html}");
    }

    #[test]
    fn test_image_component_is_salvaged() {
        let html = degrade(r#"<Image src="/a.png" alt="cap"/>"#);
        assert!(
            html.contains(r#"<img src="https://example.org/a.png" alt="cap""#),
            "got: {html}"
        );
    }

    #[test]
    fn test_custom_component_is_dropped_with_contents() {
        let html = degrade(r#"<CustomWidget foo="bar">ignored</CustomWidget>"#);
        assert!(!html.contains("ignored"), "got: {html}");
        assert!(!html.contains("CustomWidget"), "got: {html}");
    }

    #[test]
    fn test_root_relative_href_becomes_absolute() {
        let html = degrade(r#"see <a href="/articles/x">this</a>"#);
        assert!(
            html.contains(r#"href="https://example.org/articles/x""#),
            "got: {html}"
        );
    }

    #[test]
    fn test_markdown_inline_syntax() {
        let html = degrade("**bold** and *italic* and [text](https://a.b)");
        assert!(html.contains("<strong>bold</strong>"), "got: {html}");
        assert!(html.contains("<em>italic</em>"), "got: {html}");
        assert!(html.contains(r#"<a href="https://a.b">text</a>"#), "got: {html}");
    }

    #[test]
    fn test_fenced_code_block_discards_language_tag() {
        let html = degrade("```rust\nlet x = 1;\n```");
        assert!(html.contains("<pre><code>let x = 1;\n</code></pre>"), "got: {html}");
        assert!(!html.contains("rust"), "got: {html}");
    }

    #[test]
    fn test_inline_code() {
        assert!(degrade("use `cargo`").contains("<code>cargo</code>"));
    }

    #[test]
    fn test_list_run_wrapped_in_single_ul() {
        let html = degrade("- one\n- two\n");
        assert_eq!(html.matches("<ul>").count(), 1, "got: {html}");
        assert!(html.contains("<li>one</li>"), "got: {html}");
        assert!(html.contains("<li>two</li>"), "got: {html}");
    }

    #[test]
    fn test_leading_frontmatter_is_stripped() {
        let html = degrade("---\ntitle: x\ndate: 2024-01-01\n---\n\nBody");
        assert!(!html.contains("title:"), "got: {html}");
        assert!(html.contains("Body"), "got: {html}");
    }

    #[test]
    fn test_total_on_arbitrary_input() {
        // Never panics, always returns *something*.
        for garbage in [
            "",
            "\u{0}\u{1}\u{2}binary\u{fffd}garbage",
            "<Outer><Inner>deep</Inner></Outer>",
            "| a | b |\n|---|---|\n| 1 | 2 |",
            "> blockquote",
            "****",
            "```unterminated fence",
        ] {
            let _ = degrade(garbage);
        }
    }

    #[test]
    fn test_empty_input_still_produces_paragraph() {
        assert_eq!(degrade(""), "<p></p>");
    }

    #[test]
    fn test_plain_text_wrapped_in_paragraph() {
        assert_eq!(degrade("just words"), "<p>just words</p>");
    }
}
