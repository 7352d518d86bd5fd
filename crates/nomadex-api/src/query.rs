//! Paginated entry queries.
//!
//! Wraps the `entries/query` endpoint: a structured boolean query body is
//! POSTed repeatedly, advancing the `page_after_value` cursor until the
//! server stops returning one or a caller-supplied page cap is reached.

use indicatif::ProgressBar;
use serde_json::{json, Value};

use crate::client::NomadClient;
use crate::error::ApiError;
use crate::record::Record;

/// Builder for the structured boolean query body of `entries/query`.
///
/// Clauses accumulate under `query.and`; owner defaults to `"visible"`.
#[derive(Debug, Clone)]
pub struct EntryQuery {
    owner: String,
    clauses: Vec<Value>,
    required: Option<Value>,
}

impl EntryQuery {
    pub fn new() -> Self {
        Self {
            owner: "visible".to_string(),
            clauses: Vec::new(),
            required: None,
        }
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    /// Filter by ELN section type (`results.eln.sections:any`).
    pub fn section(self, section: &str) -> Self {
        self.clause(json!({"results.eln.sections:any": [section]}))
    }

    /// Filter by entry type.
    pub fn entry_type(self, entry_type: &str) -> Self {
        self.clause(json!({"entry_type": entry_type}))
    }

    /// Require a quantity to be present (`quantities:all`).
    pub fn quantity(self, quantity: &str) -> Self {
        self.clause(json!({"quantities:all": [quantity]}))
    }

    /// Add a free-form `and` clause.
    pub fn clause(mut self, clause: Value) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Restrict which archive sections the server includes in each record.
    pub fn required(mut self, required: Value) -> Self {
        self.required = Some(required);
        self
    }

    pub(crate) fn to_body(&self, page_size: usize, cursor: Option<&str>) -> Value {
        let mut pagination = json!({"page_size": page_size});
        if let Some(cursor) = cursor {
            pagination["page_after_value"] = json!(cursor);
        }
        let mut body = json!({
            "owner": self.owner,
            "query": {"and": self.clauses},
            "pagination": pagination,
        });
        if let Some(required) = &self.required {
            body["required"] = required.clone();
        }
        body
    }
}

impl Default for EntryQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch every record matching `query`, one page at a time.
///
/// Records accumulate in server-returned order; no deduplication or
/// re-ordering. `max_pages` caps the number of page requests (`None`
/// processes the full result set). A page with zero records but a valid next
/// cursor is non-terminal. A malformed page aborts the run; there is no
/// partial-result recovery.
pub fn query_all(
    client: &NomadClient,
    query: &EntryQuery,
    page_size: usize,
    max_pages: Option<usize>,
) -> Result<Vec<Record>, ApiError> {
    query_all_with_progress(client, query, page_size, max_pages, &ProgressBar::hidden())
}

/// [`query_all`] reporting progress through `bar`.
///
/// The bar length is set from `pagination.total` once the first page reveals
/// it; each parsed record advances the bar by one.
pub fn query_all_with_progress(
    client: &NomadClient,
    query: &EntryQuery,
    page_size: usize,
    max_pages: Option<usize>,
    bar: &ProgressBar,
) -> Result<Vec<Record>, ApiError> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0usize;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("page cap of {max} reached, stopping pagination");
                break;
            }
        }

        let body = query.to_body(page_size, cursor.as_deref());
        let page = client.post("entries/query", &body)?;
        pages_fetched += 1;

        let data = page
            .get("data")
            .ok_or_else(|| ApiError::data_format("page response missing 'data' field"))?;
        let entries = data
            .as_array()
            .ok_or_else(|| ApiError::data_format("'data' field is not an array"))?;

        if pages_fetched == 1 {
            if let Some(total) = page
                .get("pagination")
                .and_then(|p| p.get("total"))
                .and_then(Value::as_u64)
            {
                bar.set_length(total);
                log::debug!("server reports {total} matching entries");
            }
        }

        for entry in entries {
            let record: Record = serde_json::from_value(entry.clone())
                .map_err(|e| ApiError::data_format(format!("malformed entry in 'data': {e}")))?;
            records.push(record);
            bar.inc(1);
        }

        cursor = match next_cursor(&page)? {
            Some(next) => {
                log::debug!(
                    "page {pages_fetched}: {} records, continuing after {next}",
                    entries.len()
                );
                Some(next)
            }
            None => {
                log::debug!("page {pages_fetched}: {} records, end of results", entries.len());
                break;
            }
        };
    }

    Ok(records)
}

/// Extract the next-page cursor; its absence is the end-of-results marker.
fn next_cursor(page: &Value) -> Result<Option<String>, ApiError> {
    match page
        .get("pagination")
        .and_then(|p| p.get("next_page_after_value"))
    {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ApiError::data_format(format!(
            "unexpected next_page_after_value: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_owner_clauses_and_page_size() {
        let query = EntryQuery::new()
            .section("HySprint_Sample")
            .quantity("data");
        let body = query.to_body(100, None);

        assert_eq!(body["owner"], "visible");
        assert_eq!(
            body["query"]["and"][0]["results.eln.sections:any"][0],
            "HySprint_Sample"
        );
        assert_eq!(body["query"]["and"][1]["quantities:all"][0], "data");
        assert_eq!(body["pagination"]["page_size"], 100);
        assert!(body["pagination"].get("page_after_value").is_none());
        assert!(body.get("required").is_none());
    }

    #[test]
    fn body_carries_cursor_when_present() {
        let body = EntryQuery::new().to_body(50, Some("e-123"));
        assert_eq!(body["pagination"]["page_after_value"], "e-123");
    }

    #[test]
    fn body_carries_required_sections() {
        let query = EntryQuery::new().required(serde_json::json!({"data": "*"}));
        let body = query.to_body(10, None);
        assert_eq!(body["required"]["data"], "*");
    }

    #[test]
    fn next_cursor_absent_means_end() {
        let page = serde_json::json!({"data": [], "pagination": {"total": 0}});
        assert_eq!(next_cursor(&page).unwrap(), None);

        // A missing pagination object also terminates
        let page = serde_json::json!({"data": []});
        assert_eq!(next_cursor(&page).unwrap(), None);
    }

    #[test]
    fn next_cursor_accepts_strings_and_numbers() {
        let page = serde_json::json!({"pagination": {"next_page_after_value": "abc"}});
        assert_eq!(next_cursor(&page).unwrap().as_deref(), Some("abc"));

        let page = serde_json::json!({"pagination": {"next_page_after_value": 42}});
        assert_eq!(next_cursor(&page).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn next_cursor_rejects_other_types() {
        let page = serde_json::json!({"pagination": {"next_page_after_value": ["x"]}});
        assert!(next_cursor(&page).is_err());
    }
}
