//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock websites and run whole
//! harvests end-to-end, from the source list to the written reports.

use chrono::Utc;
use feed_harvest::config::{Config, HarvestConfig, OutputConfig};
use feed_harvest::output::{aggregate, build_sinks, write_all, FlatItem};
use feed_harvest::{load_sources, run_harvest, Mode, Outcome, Source};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(timeout_ms: u64, concurrency: usize) -> Config {
    Config {
        harvest: HarvestConfig {
            items_per_source: 5,
            timeout_ms,
            concurrency,
        },
        ..Config::default()
    }
}

fn source(id: &str, url: &str) -> Source {
    Source {
        id: id.to_string(),
        name: format!("Source {}", id),
        url: url.to_string(),
        category: None,
        region: None,
    }
}

fn rss_feed(base: &str, count: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Feed</title>"#);
    for i in 1..=count {
        xml.push_str(&format!(
            "<item><title>Article {i}</title><link>{base}/articles/{i}</link><pubDate>Mon, 0{i} Jan 2024 09:00:00 GMT</pubDate></item>",
            i = i,
            base = base
        ));
    }
    xml.push_str("</channel></rss>");
    xml
}

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_feed(server: &MockServer, route: &str, xml: &str, content_type: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(xml.to_string(), content_type))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_declared_rss_feed_capped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><head><link rel="alternate" type="application/rss+xml" href="/rss.xml"></head>
        <body><h1><a href="/front">Front page story</a></h1></body></html>"#,
    )
    .await;
    mount_feed(&server, "/rss.xml", &rss_feed(&base, 10), "application/rss+xml").await;

    let results = run_harvest(&create_test_config(5000, 6), vec![source("1", &format!("{}/", base))])
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.mode, Mode::Rss);
    assert_eq!(result.outcome(), Outcome::Feed);
    assert_eq!(result.items.len(), 5);
    assert_eq!(result.items[0].title, "Article 1");
    assert_eq!(result.items[4].url.as_str(), format!("{}/articles/5", base));
    assert_eq!(result.items[0].date.as_deref(), Some("Mon, 01 Jan 2024 09:00:00 GMT"));
    assert_eq!(result.status, Some(200));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_conventional_atom_path() {
    let server = MockServer::start().await;
    let atom = r#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom">
        <entry><title>Atom one</title><link rel="alternate" href="/a/1"/><updated>2024-02-01T00:00:00Z</updated></entry>
        <entry><title>Atom two</title><link href="/a/2"/><published>2024-02-02T00:00:00Z</published></entry>
    </feed>"#;

    mount_html(&server, "/", "<html><body><p>No feed links declared</p></body></html>").await;
    mount_feed(&server, "/atom.xml", atom, "application/atom+xml").await;

    let results = run_harvest(&create_test_config(5000, 6), vec![source("atom", &server.uri())])
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.mode, Mode::Rss);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[1].url.as_str(), format!("{}/a/2", server.uri()));
    assert_eq!(result.items[1].date.as_deref(), Some("2024-02-02T00:00:00Z"));
    // /feed, /rss and /rss.xml answer 404 before /atom.xml
    assert_eq!(result.candidates_tried, 4);
}

#[tokio::test]
async fn test_html_fallback_without_feeds() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><body>
            <a href="/">Home</a>
            <a href="/n/1">Council approves solar farm</a>
            <a href="/n/2">Grid operator reports record</a>
            <a href="/n/3">New subsidy scheme announced</a>
        </body></html>"#,
    )
    .await;

    let results = run_harvest(&create_test_config(5000, 6), vec![source("html", &server.uri())])
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.mode, Mode::Html);
    assert_eq!(result.outcome(), Outcome::HtmlFallback);
    assert_eq!(result.items.len(), 3);
    assert!(result.items.iter().all(|i| i.date.is_none()));
    assert_eq!(result.candidates_tried, 5);
    assert_eq!(result.feeds_parsed, 0);
}

#[tokio::test]
async fn test_first_working_candidate_wins() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><head>
            <link rel="alternate" type="application/rss+xml" href="/first.xml">
            <link rel="alternate" type="application/rss+xml" href="/second.xml">
        </head><body></body></html>"#,
    )
    .await;
    mount_feed(&server, "/first.xml", &rss_feed(&base, 2), "application/rss+xml").await;
    Mock::given(method("GET"))
        .and(path("/second.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(rss_feed(&base, 5), "application/rss+xml"))
        .expect(0)
        .mount(&server)
        .await;

    let results = run_harvest(&create_test_config(5000, 6), vec![source("1", &base)])
        .await
        .unwrap();

    assert_eq!(results[0].items.len(), 2);
    assert_eq!(results[0].candidates_tried, 1);
}

#[tokio::test]
async fn test_empty_feed_then_no_headlines() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><head><link rel="alternate" type="application/rss+xml" href="/feed"></head><body></body></html>"#,
    )
    .await;
    mount_feed(&server, "/feed", "<rss><channel><title>Empty</title></channel></rss>", "application/rss+xml").await;

    let results = run_harvest(&create_test_config(5000, 6), vec![source("1", &server.uri())])
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.mode, Mode::None);
    assert!(result.error.is_none());
    assert_eq!(result.outcome(), Outcome::ParsedButEmpty);
}

#[tokio::test]
async fn test_homepage_failure_modes() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&broken)
        .await;

    let sources = vec![
        source("status", &format!("{}/", broken.uri())),
        source("refused", "http://127.0.0.1:1/"),
        source("garbage", "not a url"),
    ];

    let results = run_harvest(&create_test_config(2000, 6), sources).await.unwrap();

    assert_eq!(results[0].status, Some(503));
    assert_eq!(results[0].error.as_deref(), Some("HTTP 503 on homepage"));
    for result in &results {
        assert_eq!(result.mode, Mode::None);
        assert!(result.items.is_empty());
        assert_eq!(result.outcome(), Outcome::FetchFailed);
        assert_eq!(result.candidates_tried, 0);
    }
    assert!(results[1].error.as_deref().unwrap().starts_with("fetch failed"));
}

#[tokio::test]
async fn test_slow_source_isolated_and_order_kept() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>").set_delay(Duration::from_secs(5)))
        .mount(&slow)
        .await;

    let mut servers = Vec::new();
    for _ in 0..3 {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_html(
            &server,
            "/",
            r#"<html><head><link rel="alternate" type="application/rss+xml" href="/rss.xml"></head></html>"#,
        )
        .await;
        mount_feed(&server, "/rss.xml", &rss_feed(&base, 3), "text/xml").await;
        servers.push(server);
    }

    let sources = vec![
        source("a", &servers[0].uri()),
        source("slow", &slow.uri()),
        source("b", &servers[1].uri()),
        source("c", &servers[2].uri()),
    ];

    let started = Instant::now();
    let results = run_harvest(&create_test_config(300, 2), sources).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(4));

    let ids: Vec<&str> = results.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "slow", "b", "c"]);

    assert_eq!(results[1].mode, Mode::None);
    assert!(results[1].error.as_deref().unwrap().contains("timed out after 300ms"));
    for index in [0, 2, 3] {
        assert_eq!(results[index].mode, Mode::Rss);
        assert_eq!(results[index].items.len(), 3);
    }
}

#[tokio::test]
async fn test_end_to_end_reports() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><head><link rel="alternate" type="application/rss+xml" href="/rss.xml"></head></html>"#,
    )
    .await;
    mount_feed(&server, "/rss.xml", &rss_feed(&base, 3), "application/rss+xml").await;

    let sources_path = dir.path().join("sources.json");
    std::fs::write(
        &sources_path,
        format!(
            r#"{{"sources": [
                {{"id": 1, "name": "Working", "url": "{}", "category": "news"}},
                {{"id": "two", "name": "Broken", "url": "http://127.0.0.1:1/"}}
            ]}}"#,
            base
        ),
    )
    .unwrap();

    let mut config = create_test_config(2000, 6);
    config.output = OutputConfig {
        json_path: dir.path().join("reports/feeds.json").to_string_lossy().into_owned(),
        ndjson_path: dir.path().join("reports/feeds.ndjson").to_string_lossy().into_owned(),
        summary_path: dir.path().join("reports/feeds_summary.md").to_string_lossy().into_owned(),
        sample_size: 10,
    };

    let sources = load_sources(&sources_path).unwrap();
    let results = run_harvest(&config, sources).await.unwrap();
    let report = aggregate(&results, Utc::now(), config.output.sample_size);
    write_all(&build_sinks(&config.output), &report).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.output.json_path).unwrap()).unwrap();
    assert_eq!(json["count"], 3);
    assert_eq!(json["items"][0]["source_id"], "1");
    assert_eq!(json["items"][0]["mode"], "rss");
    assert_eq!(json["items"][0]["scraped_at"], json["scraped_at"]);

    let ndjson = std::fs::read_to_string(&config.output.ndjson_path).unwrap();
    let lines: Vec<FlatItem> = ndjson.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2].title, "Article 3");

    let summary = std::fs::read_to_string(&config.output.summary_path).unwrap();
    assert!(summary.contains("**OK (≥1 item)**: 1 / **KO**: 1"));
    assert!(summary.contains("Broken"));
    assert!(summary.contains("### Working"));
}
