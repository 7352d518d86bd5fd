//! NOMAD API client.
//!
//! Blocking facade over a shared async reqwest client: call sites stay
//! strictly sequential while connection pooling is reused across requests.

use std::sync::LazyLock;
use std::time::Duration;

use serde_json::Value;

use crate::auth::Credentials;
use crate::error::ApiError;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
});

/// Shared tokio runtime for HTTP operations.
static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Drive a future to completion on the shared runtime.
pub(crate) fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    SHARED_RUNTIME.handle().block_on(fut)
}

/// Get shared HTTP client.
pub(crate) fn http() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

pub use reqwest::Method;

/// Authenticated client for one NOMAD Oasis.
///
/// The bearer token is resolved once at construction from an explicit
/// [`Credentials`] value; there is no process-global credential state.
pub struct NomadClient {
    base_url: String,
    token: String,
}

impl NomadClient {
    /// Build a client for `base_url`, exchanging username/password
    /// credentials for a token if necessary.
    pub fn new(base_url: &str, credentials: &Credentials) -> Result<Self, ApiError> {
        let token = credentials.acquire_token(base_url)?;
        Ok(Self::with_token(base_url, token))
    }

    /// Build a client from an already-held access token.
    pub fn with_token(base_url: &str, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an authenticated API request.
    ///
    /// Returns the parsed JSON body, or [`Value::Null`] for empty response
    /// bodies (e.g. DELETE). Failures propagate immediately; there is no
    /// retry policy.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let result: Result<String, reqwest::Error> = block_on(async {
            let mut req = http()
                .request(method, &url)
                .bearer_auth(&self.token);
            if !query.is_empty() {
                req = req.query(query);
            }
            if let Some(body) = body {
                req = req.json(body);
            }
            let resp = req.send().await?.error_for_status()?;
            resp.text().await
        });

        match result {
            Ok(text) if text.is_empty() => Ok(Value::Null),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| ApiError::data_format(format!("response is not valid JSON: {e}"))),
            Err(e) => Err(ApiError::from_reqwest(&e)),
        }
    }

    pub fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, &[], None)
    }

    pub fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.request(Method::GET, path, query, None)
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::POST, path, &[], Some(body))
    }

    /// The authenticated user (`users/me`). Doubles as token verification.
    pub fn me(&self) -> Result<Value, ApiError> {
        self.get("users/me")
    }

    /// Look up a user by id (`users/{id}`).
    pub fn user(&self, user_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("users/{user_id}"))
    }

    /// Look up a user by email. Returns `None` when no user matches.
    pub fn user_by_email(&self, email: &str) -> Result<Option<Value>, ApiError> {
        let resp = self.get_with_query("users", &[("email", email)])?;
        Ok(resp
            .get("data")
            .and_then(Value::as_array)
            .and_then(|users| users.first())
            .cloned())
    }

    /// Upload metadata (`uploads/{id}`), carrying the authoritative author
    /// fields for every entry published under it.
    pub fn upload(&self, upload_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("uploads/{upload_id}"))
    }
}

impl std::fmt::Debug for NomadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted
        f.debug_struct("NomadClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = NomadClient::with_token("https://example.org/api/v1/", "tok");
        assert_eq!(client.base_url(), "https://example.org/api/v1");
    }

    #[test]
    fn debug_omits_token() {
        let client = NomadClient::with_token("https://example.org/api/v1", "secret-token");
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("secret-token"));
    }
}
