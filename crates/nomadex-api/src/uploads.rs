//! Upload metadata enrichment.
//!
//! The `entries/query` endpoint does not always carry author fields; the
//! upload an entry was published under is authoritative for them. This
//! module backfills records from `uploads/{id}`, fetching each upload once.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::client::NomadClient;
use crate::error::ApiError;
use crate::record::{AuthorId, Record, lenient_author_id, lenient_author_ids, lenient_datetime};

/// Author and publication metadata of one upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadMeta {
    #[serde(default, deserialize_with = "lenient_author_id")]
    pub main_author: Option<AuthorId>,
    #[serde(default, deserialize_with = "lenient_author_ids")]
    pub coauthors: Vec<AuthorId>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub upload_create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub upload_name: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// Fetch the metadata of one upload.
pub fn fetch_upload_meta(client: &NomadClient, upload_id: &str) -> Result<UploadMeta, ApiError> {
    let resp = client.upload(upload_id)?;
    let data = resp
        .get("data")
        .filter(|data| data.is_object())
        .ok_or_else(|| ApiError::data_format("upload response missing 'data' object"))?;
    serde_json::from_value(data.clone())
        .map_err(|e| ApiError::data_format(format!("malformed upload metadata: {e}")))
}

/// Backfill author fields on records that have an upload but no main author.
///
/// Upload responses are cached per id within the call, so shared uploads are
/// fetched once. Failures here are fatal, matching the query runner rather
/// than the name resolver. Returns the number of records enriched.
pub fn enrich_from_uploads(
    client: &NomadClient,
    records: &mut [Record],
) -> Result<usize, ApiError> {
    let mut cache: BTreeMap<String, UploadMeta> = BTreeMap::new();
    let mut enriched = 0usize;

    for record in records.iter_mut() {
        if record.main_author.is_some() {
            continue;
        }
        let Some(upload_id) = record.upload_id.clone() else {
            continue;
        };

        if !cache.contains_key(&upload_id) {
            let meta = fetch_upload_meta(client, &upload_id)?;
            cache.insert(upload_id.clone(), meta);
        }
        let meta = &cache[&upload_id];

        record.main_author = meta.main_author.clone();
        if record.coauthors.is_empty() {
            record.coauthors = meta.coauthors.clone();
        }
        record.published = record.published || meta.published;
        if record.upload_create_time.is_none() {
            record.upload_create_time = meta.upload_create_time;
        }
        if record.upload_name.is_none() {
            record.upload_name = meta.upload_name.clone();
        }
        if let Some(license) = &meta.license {
            record
                .extra
                .entry("license".to_string())
                .or_insert_with(|| Value::String(license.clone()));
        }
        enriched += 1;
    }

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_meta_parses_leniently() {
        let meta: UploadMeta = serde_json::from_value(json!({
            "main_author": "a-1",
            "coauthors": ["a-2", 5],
            "published": true,
            "upload_create_time": "2024-01-02T10:00:00+00:00",
            "upload_name": "batch 7"
        }))
        .unwrap();

        assert_eq!(meta.main_author, Some(AuthorId::from("a-1")));
        assert_eq!(meta.coauthors, vec![AuthorId::from("a-2")]);
        assert!(meta.published);
        assert_eq!(meta.upload_name.as_deref(), Some("batch 7"));
        assert_eq!(meta.license, None);
    }

    #[test]
    fn upload_meta_defaults_when_sparse() {
        let meta: UploadMeta = serde_json::from_value(json!({})).unwrap();
        assert_eq!(meta.main_author, None);
        assert!(meta.coauthors.is_empty());
        assert!(!meta.published);
    }
}
