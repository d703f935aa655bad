use url::Url;

/// Schemes and prefixes that never point at a readable page
const SKIPPED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use feed_harvest::links::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/news/").unwrap();
/// let url = resolve_link("../about", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if is_http(&absolute) && absolute.host_str().is_some() {
        Some(absolute)
    } else {
        None
    }
}

/// Returns true if `value` is already an absolute HTTP(S) URL on its own
///
/// Used where a value may only be taken as a link when it needs no base,
/// such as an RSS `guid`.
pub fn is_absolute_http(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|u| is_http(&u) && u.host_str().is_some())
        .unwrap_or(false)
}

/// Returns the origin of a site (scheme, host and port, root path)
pub fn site_origin(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}

/// Parses a configured source URL, accepting only HTTP(S)
pub fn parse_source_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !is_http(&url) {
        return Err(format!(
            "only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        ));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(url)
}

fn is_http(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}
