//! Headline extraction from homepage markup
//!
//! This is the fallback used when a site has no usable feed:
//! - Headings (`h1`, `h2`) that wrap a link are taken as article headlines
//! - Failing that, any link with a meaningful amount of text is taken

use crate::harvest::text::collapse_whitespace;
use crate::harvest::Item;
use crate::links::resolve_link;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Anchor text must be longer than this to count in the secondary pass
const MIN_ANCHOR_TEXT_CHARS: usize = 4;

/// Extracts up to `cap` headline items from a homepage
///
/// Items never carry a date. Links resolve against `base_url`, which
/// should be the homepage's final URL.
pub fn extract_headlines(html: &str, base_url: &Url, cap: usize) -> Vec<Item> {
    if cap == 0 || html.trim().is_empty() {
        return Vec::new();
    }

    let document = Html::parse_document(html);

    let items = heading_links(&document, base_url, cap);
    if !items.is_empty() {
        return items;
    }

    tracing::trace!("No linked headings on {}, scanning all anchors", base_url);
    text_links(&document, base_url, cap)
}

/// First anchor inside each `h1`/`h2`
fn heading_links(document: &Html, base_url: &Url, cap: usize) -> Vec<Item> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    let (Ok(heading_selector), Ok(anchor_selector)) =
        (Selector::parse("h1, h2"), Selector::parse("a[href]"))
    else {
        return items;
    };

    for heading in document.select(&heading_selector) {
        let Some(anchor) = heading.select(&anchor_selector).next() else {
            continue;
        };

        if let Some(item) = anchor_item(anchor, base_url) {
            if seen.insert(item.url.clone()) {
                items.push(item);
                if items.len() >= cap {
                    break;
                }
            }
        }
    }

    items
}

/// Every anchor with enough visible text, in document order
fn text_links(document: &Html, base_url: &Url, cap: usize) -> Vec<Item> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return items;
    };

    for anchor in document.select(&anchor_selector) {
        let Some(item) = anchor_item(anchor, base_url) else {
            continue;
        };

        if item.title.chars().count() <= MIN_ANCHOR_TEXT_CHARS {
            continue;
        }

        if seen.insert(item.url.clone()) {
            items.push(item);
            if items.len() >= cap {
                break;
            }
        }
    }

    items
}

fn anchor_item(anchor: ElementRef<'_>, base_url: &Url) -> Option<Item> {
    let href = anchor.value().attr("href")?;
    let url = resolve_link(href, base_url)?;

    let title = collapse_whitespace(&anchor.text().collect::<String>());
    if title.is_empty() {
        return None;
    }

    Some(Item {
        title,
        url,
        date: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://news.example.org/").unwrap()
    }

    #[test]
    fn test_heading_links() {
        let html = r#"<html><body>
            <h1><a href="/a">  Big   story </a></h1>
            <h2>No link here</h2>
            <h2><span>Section</span> <a href="https://news.example.org/b"><em>Second</em> story</a><a href="/ignored">x</a></h2>
            <p><a href="/c">A paragraph link that is long</a></p>
        </body></html>"#;

        let items = extract_headlines(html, &base_url(), 5);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Big story");
        assert_eq!(items[0].url.as_str(), "https://news.example.org/a");
        assert_eq!(items[1].title, "Second story");
        assert!(items.iter().all(|i| i.date.is_none()));
    }

    #[test]
    fn test_inline_markup_inside_word() {
        let html = r#"<h2><a href="/a">L'<em>énergie</em> sol<b>aire</b></a></h2>"#;
        let items = extract_headlines(html, &base_url(), 5);
        assert_eq!(items[0].title, "L'énergie solaire");
    }

    #[test]
    fn test_heading_links_dedup_and_cap() {
        let html = r#"
            <h2><a href="/1">One</a></h2>
            <h2><a href="/1">One again</a></h2>
            <h2><a href="/2">Two</a></h2>
            <h2><a href="/3">Three</a></h2>
        "#;

        let items = extract_headlines(html, &base_url(), 2);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_secondary_pass_three_qualifying_anchors() {
        let html = r##"<html><body>
            <nav><a href="/">Home</a><a href="#top">Back to top</a></nav>
            <a href="/news/solar-farm">Solar farm approved</a>
            <a href="mailto:desk@example.org">Email the desk</a>
            <a href="/news/grid">Grid upgrade planned</a>
            <a href="/news/solar-farm">Solar farm approved (again)</a>
            <a href="/news/wind">Wind tender opens</a>
            <a href="javascript:void(0)">Open the menu</a>
        </body></html>"##;

        let items = extract_headlines(html, &base_url(), 5);
        let urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://news.example.org/news/solar-farm",
                "https://news.example.org/news/grid",
                "https://news.example.org/news/wind",
            ]
        );
    }

    #[test]
    fn test_secondary_pass_respects_cap() {
        let html = r#"
            <a href="/1">First article</a>
            <a href="/2">Second article</a>
            <a href="/3">Third article</a>
        "#;
        assert_eq!(extract_headlines(html, &base_url(), 2).len(), 2);
    }

    #[test]
    fn test_short_anchor_text_rejected() {
        let html = r#"<a href="/1">More</a><a href="/2">  Go  </a>"#;
        assert!(extract_headlines(html, &base_url(), 5).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_headlines("", &base_url(), 5).is_empty());
        assert!(extract_headlines("<html><body></body></html>", &base_url(), 5).is_empty());
    }
}
