//! Source list input
//!
//! A run starts from a JSON document with a `sources` array. Problems with
//! the document as a whole are fatal; problems with one source's URL are
//! left for the harvester to record against that source.

mod loader;

pub use loader::{load_sources, parse_sources};

use serde::{Deserialize, Deserializer, Serialize};

/// A website to harvest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Stable identifier; numeric ids in the input are kept as strings
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Display name used in reports and the newsletter
    pub name: String,

    /// Homepage URL
    pub url: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
