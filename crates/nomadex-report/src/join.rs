//! Join author names onto sample records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nomadex_api::{AuthorId, AuthorNameMap, Record, UNKNOWN_AUTHOR};

/// Separator for multi-valued CSV cells (coauthor columns).
const LIST_SEPARATOR: &str = "; ";

/// One flat, export-ready row: a record with author names joined on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedSample {
    pub entry_id: Option<String>,
    pub upload_id: Option<String>,
    pub upload_name: Option<String>,
    pub main_author_id: Option<AuthorId>,
    pub main_author: Option<String>,
    pub coauthor_ids: String,
    pub coauthors: String,
    pub published: bool,
    pub upload_create_time: Option<DateTime<Utc>>,
}

/// Look up a display name, falling back to the unknown sentinel.
///
/// [`resolve_names`](nomadex_api::resolve_names) already guarantees an entry
/// per id; the fallback keeps a caller-constructed partial map from breaking
/// the join.
fn name_of(names: &AuthorNameMap, id: &AuthorId) -> String {
    names
        .get(id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// Join `names` onto `records`, preserving record order.
pub fn join(records: &[Record], names: &AuthorNameMap) -> Vec<JoinedSample> {
    records
        .iter()
        .map(|record| {
            let coauthor_ids: Vec<&str> =
                record.coauthors.iter().map(AuthorId::as_str).collect();
            let coauthor_names: Vec<String> = record
                .coauthors
                .iter()
                .map(|id| name_of(names, id))
                .collect();
            JoinedSample {
                entry_id: record.entry_id.clone(),
                upload_id: record.upload_id.clone(),
                upload_name: record.upload_name.clone(),
                main_author_id: record.main_author.clone(),
                main_author: record.main_author.as_ref().map(|id| name_of(names, id)),
                coauthor_ids: coauthor_ids.join(LIST_SEPARATOR),
                coauthors: coauthor_names.join(LIST_SEPARATOR),
                published: record.published,
                upload_create_time: record.upload_create_time,
            }
        })
        .collect()
}
