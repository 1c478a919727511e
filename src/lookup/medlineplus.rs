use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condensed MedlinePlus Connect feed for one code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedlinePlusSummary {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub updated: String,
    pub entries: Vec<MedlinePlusEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedlinePlusEntry {
    pub title: String,
    pub link: String,
    /// Plain text; the feed ships HTML.
    pub summary: String,
    pub updated: String,
}

/// Extract the fields we expose from a MedlinePlus Connect JSON response.
///
/// The feed wraps most scalars as `{"_value": ...}`; anything missing comes
/// back as an empty string rather than an error.
pub fn extract_summary(data: &Value) -> MedlinePlusSummary {
    let feed = &data["feed"];

    let entries = feed["entry"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .map(|entry| MedlinePlusEntry {
                    title: wrapped(&entry["title"]),
                    link: entry["link"][0]["href"].as_str().unwrap_or_default().to_string(),
                    summary: html_to_text(&wrapped(&entry["summary"])),
                    updated: wrapped(&entry["updated"]),
                })
                .collect()
        })
        .unwrap_or_default();

    MedlinePlusSummary {
        title: wrapped(&feed["title"]),
        subtitle: wrapped(&feed["subtitle"]),
        author: wrapped(&feed["author"]["name"]),
        updated: wrapped(&feed["updated"]),
        entries,
    }
}

fn wrapped(node: &Value) -> String {
    node["_value"].as_str().unwrap_or_default().to_string()
}

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Strip markup, then decode named and numeric character references in a
/// single pass, so `&amp;lt;` stays `&lt;`. Non-breaking spaces become
/// plain spaces.
pub fn html_to_text(html: &str) -> String {
    let stripped = TAG.replace_all(html, "");
    html_escape::decode_html_entities(&stripped).replace('\u{a0}', " ")
}
