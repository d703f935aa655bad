use crate::sources::Source;
use crate::InputError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SourceDocument {
    sources: Option<Vec<Source>>,
}

/// Loads the source list from a JSON file
///
/// # Errors
///
/// * `InputError::Io` - the file is missing or unreadable
/// * `InputError::Parse` - the file is not valid JSON of the expected shape
/// * `InputError::MissingSources` - the document has no `sources` array
/// * `InputError::Empty` - the `sources` array is empty
pub fn load_sources(path: &Path) -> Result<Vec<Source>, InputError> {
    let raw = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let sources = parse_sources(&raw, path)?;
    tracing::debug!("Loaded {} sources from {}", sources.len(), path.display());
    Ok(sources)
}

/// Parses a source list document; `origin` is only used in error messages
pub fn parse_sources(raw: &str, origin: &Path) -> Result<Vec<Source>, InputError> {
    let document: SourceDocument = serde_json::from_str(raw)?;

    let sources = document
        .sources
        .ok_or_else(|| InputError::MissingSources(origin.to_path_buf()))?;

    if sources.is_empty() {
        return Err(InputError::Empty(origin.to_path_buf()));
    }

    Ok(sources)
}
