use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Offset-less form returned for `timestamp without time zone` columns
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single displayable content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Opaque identifier, unique within one collection snapshot
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-form; matched against the fixed category filter list
    pub category: String,
    /// Score in [0, 5]
    pub rating: f64,
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// ISO-8601 creation instant, kept exactly as received
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub trending: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Integer keys from the hosted table are kept as their decimal text
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Unsigned(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Int(id) => id.to_string(),
        Id::Unsigned(id) => id.to_string(),
    })
}

impl Recommendation {
    /// Parsed creation instant, `None` when the timestamp is not ISO-8601.
    ///
    /// Timestamps without an offset, and bare dates, are read as UTC.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let timestamp = self.timestamp.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, NAIVE_DATETIME_FORMAT) {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(timestamp, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
