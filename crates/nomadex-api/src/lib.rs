//! nomadex-api - NOMAD Oasis API client
//!
//! This crate provides the sequential client stack for one export run:
//! credential resolution, authenticated requests, cursor pagination over
//! entry queries, and author-id to display-name resolution.

pub mod auth;
pub mod authors;
pub mod client;
pub mod error;
pub mod query;
pub mod record;
pub mod uploads;

// Re-exports
pub use auth::{Credentials, DEFAULT_OASIS, authenticate, base_url_from_env, oasis_url};
pub use authors::{
    AuthorNameMap, UNKNOWN_AUTHOR, resolve_names, resolve_names_with_progress, unique_authors,
};
pub use client::{Method, NomadClient};
pub use error::ApiError;
pub use query::{EntryQuery, query_all, query_all_with_progress};
pub use record::{AuthorId, Record};
pub use uploads::{UploadMeta, enrich_from_uploads, fetch_upload_meta};
