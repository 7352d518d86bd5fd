//! Sample record model.
//!
//! Entry metadata comes back as loosely-typed JSON. Known attributes get
//! named optional fields; everything else is preserved verbatim in `extra`
//! so downstream consumers keep access to unrecognized nested data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque author identifier, distinct from the display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One sample entry as returned by `entries/query`.
///
/// Immutable once fetched (upload enrichment backfills missing fields but
/// never overwrites present ones); lifetime is one run. Author fields parse
/// leniently: absent or malformed values become `None`/empty rather than
/// failing the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_author_id")]
    pub main_author: Option<AuthorId>,
    #[serde(default, deserialize_with = "lenient_author_ids")]
    pub coauthors: Vec<AuthorId>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub upload_create_time: Option<DateTime<Utc>>,
    /// Unrecognized response fields, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A non-empty string becomes an id; anything else is treated as absent.
pub(crate) fn lenient_author_id<'de, D>(deserializer: D) -> Result<Option<AuthorId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(AuthorId::new(s)),
        _ => None,
    })
}

/// Non-list values count as zero coauthors; non-string or empty elements are
/// dropped.
pub(crate) fn lenient_author_ids<'de, D>(deserializer: D) -> Result<Vec<AuthorId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(AuthorId::new(s)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// RFC 3339 timestamps parse; anything else is treated as absent.
pub(crate) fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_record() {
        let record: Record = serde_json::from_value(json!({
            "entry_id": "e-1",
            "upload_id": "u-1",
            "main_author": "a-1",
            "coauthors": ["a-2", "a-3"],
            "published": true,
            "upload_create_time": "2024-03-01T09:30:00.716000+00:00",
            "data": {"lab_id": "HZB-42"}
        }))
        .unwrap();

        assert_eq!(record.entry_id.as_deref(), Some("e-1"));
        assert_eq!(record.main_author, Some(AuthorId::from("a-1")));
        assert_eq!(record.coauthors.len(), 2);
        assert!(record.published);
        assert!(record.upload_create_time.is_some());
        // Unrecognized nested data survives in the extra map
        assert_eq!(record.extra["data"]["lab_id"], "HZB-42");
    }

    #[test]
    fn malformed_author_fields_are_not_an_error() {
        let record: Record = serde_json::from_value(json!({
            "entry_id": "e-2",
            "main_author": {"unexpected": "object"},
            "coauthors": "not-a-list"
        }))
        .unwrap();

        assert_eq!(record.main_author, None);
        assert!(record.coauthors.is_empty());
    }

    #[test]
    fn non_string_coauthor_elements_are_dropped() {
        let record: Record = serde_json::from_value(json!({
            "coauthors": ["a-1", 7, null, "", "a-2"]
        }))
        .unwrap();

        assert_eq!(
            record.coauthors,
            vec![AuthorId::from("a-1"), AuthorId::from("a-2")]
        );
    }

    #[test]
    fn missing_fields_default() {
        let record: Record = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record.entry_id, None);
        assert_eq!(record.main_author, None);
        assert!(record.coauthors.is_empty());
        assert!(!record.published);
        assert_eq!(record.upload_create_time, None);
    }

    #[test]
    fn unparseable_timestamp_is_absent() {
        let record: Record = serde_json::from_value(json!({
            "upload_create_time": "last tuesday"
        }))
        .unwrap();
        assert_eq!(record.upload_create_time, None);
    }

    #[test]
    fn author_id_ordering_is_stable() {
        let mut ids = vec![AuthorId::from("b"), AuthorId::from("a"), AuthorId::from("c")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
        assert_eq!(ids[2].as_str(), "c");
    }
}
