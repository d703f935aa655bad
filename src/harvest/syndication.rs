//! RSS and Atom entry extraction
//!
//! Feeds in the wild are often not well-formed XML, so nothing here builds a
//! document tree. The feed is read as a stream of tokens; each `item` (RSS)
//! or `entry` (Atom) block is collected on its own, and a block that is
//! broken or incomplete is dropped without affecting the others.

use crate::harvest::text::{clean_title, strip_cdata_markers};
use crate::harvest::Item;
use crate::links::{is_absolute_http, resolve_link};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use url::Url;

/// The two syndication formats told apart by their root element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
}

impl FeedFormat {
    /// Element name of one entry block
    fn entry_tag(&self) -> &'static [u8] {
        match self {
            Self::Rss => b"item",
            Self::Atom => b"entry",
        }
    }
}

/// Returns true if a response is worth handing to [`parse_feed`]
///
/// Either the content type names a syndication format or the body opens
/// an `<rss` or `<feed` element somewhere.
pub fn looks_like_feed(content_type: &str, body: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("xml") || content_type.contains("rss") || content_type.contains("atom")
    {
        return true;
    }

    let lowered = body.to_ascii_lowercase();
    lowered.contains("<rss") || lowered.contains("<feed")
}

/// Classifies a document by its root element: `feed` means Atom
pub fn detect_format(xml: &str) -> FeedFormat {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return if e.local_name().as_ref().eq_ignore_ascii_case(b"feed") {
                    FeedFormat::Atom
                } else {
                    FeedFormat::Rss
                };
            }
            Ok(Event::Eof) | Err(_) => return FeedFormat::Rss,
            Ok(_) => {}
        }
    }
}

/// Extracts at most `cap` items from an RSS or Atom document
///
/// Items come back in document order. An entry without a title or a
/// resolvable link is skipped and does not count toward `cap`; an entry
/// whose link was already seen is skipped the same way. Reading stops as
/// soon as `cap` items are collected.
///
/// Relative links are resolved against `base_url`, normally the feed's own
/// final URL.
///
/// # Example
///
/// ```
/// use feed_harvest::harvest::parse_feed;
/// use url::Url;
///
/// let xml = r#"<rss><channel>
///     <item><title>First</title><link>/posts/1</link></item>
/// </channel></rss>"#;
/// let base = Url::parse("https://example.com/feed").unwrap();
/// let items = parse_feed(xml, &base, 5);
/// assert_eq!(items[0].url.as_str(), "https://example.com/posts/1");
/// ```
pub fn parse_feed(xml: &str, base_url: &Url, cap: usize) -> Vec<Item> {
    let format = detect_format(xml);
    let mut items = Vec::new();
    if cap == 0 {
        return items;
    }

    let mut seen: HashSet<Url> = HashSet::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = false;

    let mut entry: Option<EntryFields> = None;
    let mut last_error_position = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                let position = reader.buffer_position();
                tracing::trace!("Tokenizer error at byte {}: {}", position, e);
                // A broken token spoils the block it sits in
                entry = None;
                if last_error_position == Some(position) {
                    break;
                }
                last_error_position = Some(position);
                continue;
            }
        };

        match event {
            Event::Start(e) => {
                if is_named(&e, format.entry_tag()) {
                    // An unclosed previous block is discarded
                    entry = Some(EntryFields::within(&e));
                } else if let Some(fields) = entry.as_mut() {
                    fields.open_element(format, &e, false);
                }
            }
            Event::Empty(e) => {
                if let Some(fields) = entry.as_mut() {
                    fields.open_element(format, &e, true);
                }
            }
            Event::Text(t) => {
                if let Some(fields) = entry.as_mut() {
                    fields.push_text(&decode_text(&t));
                }
            }
            Event::CData(c) => {
                if let Some(fields) = entry.as_mut() {
                    fields.push_text(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => {
                let local = e.local_name();
                if local.as_ref().eq_ignore_ascii_case(format.entry_tag()) {
                    if let Some(fields) = entry.take() {
                        if let Some(item) = fields.into_item(format, base_url) {
                            if seen.insert(item.url.clone()) {
                                items.push(item);
                                if items.len() >= cap {
                                    break;
                                }
                            }
                        }
                    }
                } else if let Some(fields) = entry.as_mut() {
                    fields.close_element(e.name().as_ref());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    items
}

/// Which entry field the text currently being read belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Guid,
    Date,
}

/// Fields collected for one entry block, first occurrence of each wins
#[derive(Debug, Default)]
struct EntryFields {
    title: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    date: Option<String>,
    /// Atom links as (rel, href) in document order
    atom_links: Vec<(Option<String>, String)>,
    capture: Option<(Field, Vec<u8>)>,
    buffer: String,
    /// Namespace prefix of the entry element itself, empty when unprefixed
    prefix: Vec<u8>,
}

impl EntryFields {
    fn within(entry: &BytesStart<'_>) -> Self {
        Self {
            prefix: prefix_of(entry),
            ..Self::default()
        }
    }

    fn open_element(&mut self, format: FeedFormat, e: &BytesStart<'_>, empty: bool) {
        // Atom fields must share the entry's namespace prefix
        if format == FeedFormat::Atom && prefix_of(e) != self.prefix {
            return;
        }

        if format == FeedFormat::Atom && is_named(e, b"link") {
            self.record_atom_link(e);
            return;
        }

        if empty || self.capture.is_some() {
            return;
        }

        let Some(field) = field_for(format, e) else {
            return;
        };

        if self.has(field) {
            return;
        }

        self.capture = Some((field, e.name().as_ref().to_vec()));
        self.buffer.clear();
    }

    fn push_text(&mut self, text: &str) {
        if self.capture.is_some() {
            self.buffer.push_str(text);
        }
    }

    fn close_element(&mut self, qualified_name: &[u8]) {
        let closes_capture = matches!(
            &self.capture,
            Some((_, name)) if name.eq_ignore_ascii_case(qualified_name)
        );
        if !closes_capture {
            return;
        }

        if let Some((field, _)) = self.capture.take() {
            let value = std::mem::take(&mut self.buffer);
            let slot = match field {
                Field::Title => &mut self.title,
                Field::Link => &mut self.link,
                Field::Guid => &mut self.guid,
                Field::Date => &mut self.date,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
    }

    fn has(&self, field: Field) -> bool {
        match field {
            Field::Title => self.title.is_some(),
            Field::Link => self.link.is_some(),
            Field::Guid => self.guid.is_some(),
            Field::Date => self.date.is_some(),
        }
    }

    fn record_atom_link(&mut self, e: &BytesStart<'_>) {
        let mut rel = None;
        let mut href = None;

        for attr in e.attributes().with_checks(false).flatten() {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            match attr.key.local_name().as_ref() {
                b"rel" => rel = Some(value.trim().to_ascii_lowercase()),
                b"href" => href = Some(value),
                _ => {}
            }
        }

        if let Some(href) = href {
            self.atom_links.push((rel, href));
        }
    }

    /// Builds the item, or None when the title or link is unusable
    fn into_item(self, format: FeedFormat, base_url: &Url) -> Option<Item> {
        let title = clean_title(self.title.as_deref().unwrap_or(""));
        if title.is_empty() {
            return None;
        }

        let raw_link = match format {
            FeedFormat::Rss => {
                let link = strip_cdata_markers(self.link.as_deref().unwrap_or(""))
                    .trim()
                    .to_string();
                if link.is_empty() {
                    self.guid
                        .map(|g| strip_cdata_markers(&g).trim().to_string())
                        .filter(|g| is_absolute_http(g))
                        .unwrap_or_default()
                } else {
                    link
                }
            }
            FeedFormat::Atom => preferred_atom_link(&self.atom_links).unwrap_or_default(),
        };

        let url = resolve_link(&raw_link, base_url)?;

        let date = self
            .date
            .map(|d| strip_cdata_markers(&d).trim().to_string())
            .filter(|d| !d.is_empty());

        Some(Item { title, url, date })
    }
}

/// First alternate (or rel-less) link, else the first link of any kind
fn preferred_atom_link(links: &[(Option<String>, String)]) -> Option<String> {
    links
        .iter()
        .find(|(rel, _)| matches!(rel.as_deref(), None | Some("alternate") | Some("")))
        .or_else(|| links.first())
        .map(|(_, href)| href.clone())
}

/// Maps an element inside an entry block to the field it fills
fn field_for(format: FeedFormat, e: &BytesStart<'_>) -> Option<Field> {
    let qualified = e.name();
    let qualified = qualified.as_ref();

    match format {
        FeedFormat::Rss => {
            if qualified.eq_ignore_ascii_case(b"title") {
                Some(Field::Title)
            } else if qualified.eq_ignore_ascii_case(b"link") {
                Some(Field::Link)
            } else if qualified.eq_ignore_ascii_case(b"guid") {
                Some(Field::Guid)
            } else if qualified.eq_ignore_ascii_case(b"pubDate") || qualified.eq_ignore_ascii_case(b"dc:date") {
                Some(Field::Date)
            } else {
                None
            }
        }
        FeedFormat::Atom => {
            let local = e.local_name();
            let local = local.as_ref();
            if local.eq_ignore_ascii_case(b"title") {
                Some(Field::Title)
            } else if local.eq_ignore_ascii_case(b"updated") || local.eq_ignore_ascii_case(b"published") {
                Some(Field::Date)
            } else {
                None
            }
        }
    }
}

fn prefix_of(e: &BytesStart<'_>) -> Vec<u8> {
    e.name()
        .prefix()
        .map(|p| p.as_ref().to_ascii_lowercase())
        .unwrap_or_default()
}

fn is_named(e: &BytesStart<'_>, local: &[u8]) -> bool {
    e.local_name().as_ref().eq_ignore_ascii_case(local)
}

/// Decodes entities, keeping the raw text when they cannot be resolved
fn decode_text(text: &BytesText<'_>) -> String {
    text.unescape_with(resolve_html5_entity)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(text).into_owned())
}
