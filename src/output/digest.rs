//! Newsletter selection
//!
//! Picks the handful of items a newsletter edition shows: the newest items
//! first, grouped by source, a few sources and a couple of items each.

use crate::output::FlatItem;
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::cmp::Ordering;

/// Sources shown in one edition
pub const DEFAULT_MAX_SOURCES: usize = 4;

/// Items shown per source
pub const DEFAULT_MAX_PER_SOURCE: usize = 2;

/// Items from one source, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterSection {
    pub source_name: String,
    pub items: Vec<FlatItem>,
}

/// Selects items for the newsletter
///
/// Items are ordered by date, newest first, with undated or unreadable
/// dates last; ties keep their report order. Groups follow the order in
/// which each source first appears after sorting. An empty input gives an
/// empty selection.
pub fn select_for_newsletter(
    items: &[FlatItem],
    max_sources: usize,
    max_per_source: usize,
) -> Vec<NewsletterSection> {
    let mut sorted: Vec<(Option<DateTime<FixedOffset>>, &FlatItem)> = items
        .iter()
        .map(|item| (item.date.as_deref().and_then(parse_date), item))
        .collect();
    sorted.sort_by(|a, b| newest_first(&a.0, &b.0));

    let mut sections: Vec<NewsletterSection> = Vec::new();
    for (_, item) in sorted {
        let key = section_key(item);
        match sections.iter_mut().find(|s| s.source_name == key) {
            Some(section) => {
                if section.items.len() < max_per_source {
                    section.items.push(item.clone());
                }
            }
            None => {
                if sections.len() >= max_sources {
                    continue;
                }
                let mut section = NewsletterSection {
                    source_name: key.to_string(),
                    items: Vec::new(),
                };
                if max_per_source > 0 {
                    section.items.push(item.clone());
                }
                sections.push(section);
            }
        }
    }

    sections
}

fn section_key(item: &FlatItem) -> &str {
    if item.source_name.trim().is_empty() {
        &item.source_id
    } else {
        &item.source_name
    }
}

fn newest_first(a: &Option<DateTime<FixedOffset>>, b: &Option<DateTime<FixedOffset>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Reads the date formats feeds actually use: RFC 2822, RFC 3339, plain dates
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().fixed_offset())
        })
}
