//! Feed discovery from homepage markup
//!
//! Sites announce their feeds with `<link rel="alternate" type="application/rss+xml">`.
//! When a homepage announces nothing, the conventional feed paths are tried instead.

use crate::links::{resolve_link, site_origin};
use scraper::{Html, Selector};
use url::Url;

/// Conventional feed locations, tried in this order when nothing is declared
pub const CONVENTIONAL_FEED_PATHS: &[&str] = &["/feed", "/rss", "/rss.xml", "/atom.xml", "/feed.xml"];

/// Extracts candidate feed URLs from a homepage
///
/// Declared feeds come first, in document order, without duplicates. Only
/// when no feed is declared are the [`CONVENTIONAL_FEED_PATHS`] appended to
/// the site origin.
///
/// # Example
///
/// ```
/// use feed_harvest::harvest::discover_feeds;
/// use url::Url;
///
/// let html = r#"<head><link rel="alternate" type="application/rss+xml" href="/feed.xml"></head>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let feeds = discover_feeds(html, &base);
/// assert_eq!(feeds[0].as_str(), "https://example.com/feed.xml");
/// ```
pub fn discover_feeds(html: &str, base_url: &Url) -> Vec<Url> {
    let mut feeds = declared_feeds(html, base_url);

    if feeds.is_empty() {
        let origin = site_origin(base_url);
        for path in CONVENTIONAL_FEED_PATHS {
            if let Ok(url) = origin.join(path) {
                push_unique(&mut feeds, url);
            }
        }
    }

    feeds
}

/// Feeds announced through alternate-link declarations
fn declared_feeds(html: &str, base_url: &Url) -> Vec<Url> {
    let mut feeds = Vec::new();
    let document = Html::parse_document(html);

    let Ok(link_selector) = Selector::parse("link[href]") else {
        return feeds;
    };

    for element in document.select(&link_selector) {
        let attrs = element.value();

        let is_alternate = attrs
            .attr("rel")
            .map(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("alternate"))
            })
            .unwrap_or(false);
        if !is_alternate {
            continue;
        }

        let is_feed_type = attrs
            .attr("type")
            .map(is_feed_mime)
            .unwrap_or(false);
        if !is_feed_type {
            continue;
        }

        if let Some(url) = attrs.attr("href").and_then(|href| resolve_link(href, base_url)) {
            push_unique(&mut feeds, url);
        }
    }

    feeds
}

/// Returns true if a declared MIME type names a syndication format
fn is_feed_mime(mime: &str) -> bool {
    let mime = mime.to_ascii_lowercase();
    mime.contains("rss") || mime.contains("atom") || mime.contains("xml")
}

fn push_unique(feeds: &mut Vec<Url>, url: Url) {
    if !feeds.contains(&url) {
        feeds.push(url);
    }
}
