//! Author extraction and name resolution.

use std::collections::{BTreeMap, BTreeSet};

use indicatif::ProgressBar;
use serde_json::Value;

use crate::client::NomadClient;
use crate::record::{AuthorId, Record};

/// Mapping from author id to display name, built once per run.
pub type AuthorNameMap = BTreeMap<AuthorId, String>;

/// Sentinel name for ids that could not be resolved.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Union of `main_author` and every coauthor id across `records`.
///
/// Records whose author fields were absent or malformed contributed nothing
/// at parse time; empty ids are skipped here.
pub fn unique_authors(records: &[Record]) -> BTreeSet<AuthorId> {
    let mut authors = BTreeSet::new();
    for record in records {
        if let Some(id) = &record.main_author {
            if !id.is_empty() {
                authors.insert(id.clone());
            }
        }
        for id in &record.coauthors {
            if !id.is_empty() {
                authors.insert(id.clone());
            }
        }
    }
    authors
}

/// Resolve each id to a display name via `users/{id}`.
///
/// This is the one partial-failure-tolerant path in the system: a lookup
/// failure for a single id is logged and recorded as [`UNKNOWN_AUTHOR`]
/// rather than aborting the run. The returned map has an entry for every id
/// passed in. Do not copy this policy to other call sites.
pub fn resolve_names(client: &NomadClient, author_ids: &BTreeSet<AuthorId>) -> AuthorNameMap {
    resolve_names_with_progress(client, author_ids, &ProgressBar::hidden())
}

/// [`resolve_names`] reporting progress through `bar`.
pub fn resolve_names_with_progress(
    client: &NomadClient,
    author_ids: &BTreeSet<AuthorId>,
    bar: &ProgressBar,
) -> AuthorNameMap {
    let mut names = AuthorNameMap::new();
    for id in author_ids {
        let name = match client.user(id.as_str()) {
            Ok(user) => display_name(&user),
            Err(e) => {
                log::warn!("user lookup failed for {id}: {e}");
                UNKNOWN_AUTHOR.to_string()
            }
        };
        names.insert(id.clone(), name);
        bar.inc(1);
    }
    names
}

/// Display name of a user response: `name`, falling back to `username`,
/// falling back to the unknown sentinel. Some deployments nest the user
/// object under `data`.
fn display_name(user: &Value) -> String {
    let user = match user.get("data") {
        Some(data) if data.is_object() => data,
        _ => user,
    };
    user.get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .or_else(|| {
            user.get("username")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
        })
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}
