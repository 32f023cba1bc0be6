//! Sitemap generation: a flat urlset covering the site origin, the
//! configured static routes, and one entry per article with its date as
//! `lastmod`. The output is deterministic for a given input.

use std::io::{self, Write};

use url::Url;

use crate::article::Article;

const URLSET_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Writes the sitemap for the given origin, static routes, and articles to
/// a [`std::io::Write`]. Routes are root-relative paths (`/about`).
pub fn write_sitemap<W: Write>(
    origin: &Url,
    routes: &[String],
    articles: &[Article],
    mut w: W,
) -> io::Result<()> {
    let site = origin.as_str().trim_end_matches('/');

    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, r#"<urlset xmlns="{URLSET_XMLNS}">"#)?;
    entry(&mut w, site, None)?;
    for route in routes {
        entry(&mut w, &format!("{site}{route}"), None)?;
    }
    for article in articles {
        entry(
            &mut w,
            &format!("{site}/articles/{}", article.slug),
            Some(&article.date),
        )?;
    }
    writeln!(w, "</urlset>")
}

fn entry<W: Write>(w: &mut W, loc: &str, lastmod: Option<&str>) -> io::Result<()> {
    match lastmod {
        Some(date) => writeln!(
            w,
            "  <url><loc>{}</loc><lastmod>{}</lastmod></url>",
            escape(loc),
            escape(date)
        ),
        None => writeln!(w, "  <url><loc>{}</loc></url>", escape(loc)),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod test {
    use super::*;

    fn article(slug: &str, date: &str) -> Article {
        Article {
            slug: slug.to_owned(),
            title: slug.to_owned(),
            date: date.to_owned(),
            description: String::new(),
            tags: Vec::new(),
            image: None,
            body: String::new(),
        }
    }

    fn render(routes: &[String], articles: &[Article]) -> String {
        let origin = Url::parse("https://example.org").unwrap();
        let mut buffer = Vec::new();
        write_sitemap(&origin, routes, articles, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_sitemap_lists_origin_routes_and_articles() {
        let routes = vec!["/about".to_owned(), "/articles".to_owned()];
        let articles = vec![article("hello", "2024-06-01")];
        let xml = render(&routes, &articles);
        assert!(xml.contains("<loc>https://example.org</loc>"), "got: {xml}");
        assert!(xml.contains("<loc>https://example.org/about</loc>"), "got: {xml}");
        assert!(
            xml.contains(
                "<url><loc>https://example.org/articles/hello</loc>\
                 <lastmod>2024-06-01</lastmod></url>"
            ),
            "got: {xml}"
        );
        assert!(xml.trim_end().ends_with("</urlset>"), "got: {xml}");
    }

    #[test]
    fn test_sitemap_escapes_special_characters() {
        let routes = vec!["/a&b".to_owned()];
        let xml = render(&routes, &[]);
        assert!(xml.contains("https://example.org/a&amp;b"), "got: {xml}");
    }

    #[test]
    fn test_sitemap_is_deterministic() {
        let routes = vec!["/about".to_owned()];
        let articles = vec![article("a", "2024-01-01"), article("b", "2023-01-01")];
        assert_eq!(render(&routes, &articles), render(&routes, &articles));
    }
}
