//! Text cleanup shared by the extractors

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes `<![CDATA[` and `]]>` markers, keeping what they wrapped
pub fn strip_cdata_markers(text: &str) -> String {
    text.replace("<![CDATA[", "").replace("]]>", "")
}

/// Removes anything that looks like a tag
///
/// A `<` only opens a tag when it is followed by a letter, `/`, `!` or `?`
/// and closed by a later `>`; a lone `<` as in "a < b" is kept.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let opens_tag = after
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
            .unwrap_or(false);

        match (opens_tag, after.find('>')) {
            (true, Some(end)) => {
                rest = &after[end + 1..];
            }
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Produces a display title: no CDATA markers, no tags, collapsed whitespace
pub fn clean_title(raw: &str) -> String {
    collapse_whitespace(&strip_tags(&strip_cdata_markers(raw)))
}
