//! Flattening of per-source results into the run report

use crate::harvest::{Mode, SourceResult};
use crate::output::stats::HarvestSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item annotated with where it came from
///
/// This is the externally visible record written to every output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatItem {
    pub source_id: String,
    pub source_name: String,
    pub source_url: String,
    pub mode: Mode,
    pub title: String,
    pub url: String,
    pub date: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

/// Everything a run produced, ready for the report sinks
///
/// Serializes as the `{scraped_at, count, items}` document.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub scraped_at: DateTime<Utc>,
    pub count: usize,
    pub items: Vec<FlatItem>,

    #[serde(skip)]
    pub summary: HarvestSummary,

    /// SHA-256 of the source list, when known
    #[serde(skip)]
    pub sources_digest: Option<String>,
}

impl HarvestReport {
    pub fn with_sources_digest(mut self, digest: impl Into<String>) -> Self {
        self.sources_digest = Some(digest.into());
        self
    }
}

/// Builds the run report from settled results
///
/// Items keep source order, then item order within a source, and all share
/// the same `scraped_at`. The summary sample holds the first `sample_size`
/// items.
pub fn aggregate(results: &[SourceResult], scraped_at: DateTime<Utc>, sample_size: usize) -> HarvestReport {
    let items: Vec<FlatItem> = results
        .iter()
        .flat_map(|result| {
            result.items.iter().map(move |item| FlatItem {
                source_id: result.source_id.clone(),
                source_name: result.source_name.clone(),
                source_url: result.source_url.clone(),
                mode: result.mode,
                title: item.title.clone(),
                url: item.url.to_string(),
                date: item.date.clone(),
                scraped_at,
            })
        })
        .collect();

    let summary = HarvestSummary::from_results(results, &items, sample_size);

    HarvestReport {
        scraped_at,
        count: items.len(),
        items,
        summary,
        sources_digest: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::Item;
    use chrono::TimeZone;
    use url::Url;

    fn item(n: usize) -> Item {
        Item {
            title: format!("Item {}", n),
            url: Url::parse(&format!("https://example.com/{}", n)).unwrap(),
            date: None,
        }
    }

    fn result(id: &str, mode: Mode, items: Vec<Item>) -> SourceResult {
        SourceResult {
            source_id: id.to_string(),
            source_name: format!("Source {}", id),
            source_url: format!("https://{}.example", id),
            items,
            mode,
            status: Some(200),
            error: None,
            candidates_tried: 1,
            feeds_parsed: 1,
        }
    }

    #[test]
    fn test_flattens_in_source_then_item_order() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
        let results = vec![
            result("a", Mode::Rss, vec![item(1), item(2)]),
            result("b", Mode::None, vec![]),
            result("c", Mode::Html, vec![item(3)]),
        ];

        let report = aggregate(&results, now, 10);

        assert_eq!(report.count, 3);
        let titles: Vec<&str> = report.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Item 1", "Item 2", "Item 3"]);
        assert_eq!(report.items[2].source_id, "c");
        assert_eq!(report.items[2].mode, Mode::Html);
        assert!(report.items.iter().all(|i| i.scraped_at == now));
    }

    #[test]
    fn test_serialized_shape() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
        let report = aggregate(&[result("a", Mode::Rss, vec![item(1)])], now, 10)
            .with_sources_digest("abc");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["scraped_at"], "2024-05-01T06:00:00Z");
        assert_eq!(value["items"][0]["mode"], "rss");
        assert_eq!(value["items"][0]["url"], "https://example.com/1");
        assert!(value["items"][0]["date"].is_null());
        assert!(value.get("summary").is_none());
        assert!(value.get("sources_digest").is_none());
    }

    #[test]
    fn test_empty_run() {
        let report = aggregate(&[], Utc::now(), 10);
        assert_eq!(report.count, 0);
        assert!(report.items.is_empty());
        assert_eq!(report.summary.sources_attempted, 0);
    }
}
