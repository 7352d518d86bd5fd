//! Authentication against a NOMAD Oasis.
//!
//! Credentials are resolved once from the environment and passed explicitly
//! into [`NomadClient::new`](crate::client::NomadClient::new); username and
//! password are exchanged for a bearer token up front so every subsequent
//! call authenticates the same way.

use serde_json::Value;

use crate::client::{self, NomadClient};
use crate::error::ApiError;

/// Access token environment variable (preferred).
pub const TOKEN_ENV: &str = "NOMAD_CLIENT_ACCESS_TOKEN";
/// Username/password fallback environment variables.
pub const USERNAME_ENV: &str = "NOMAD_USERNAME";
pub const PASSWORD_ENV: &str = "NOMAD_PASSWORD";
/// Optional base-URL override.
pub const BASE_URL_ENV: &str = "NOMAD_CLIENT_URL";

/// Known Oasis deployments, by user-facing name.
pub const OASIS_OPTIONS: &[(&str, &str)] = &[
    ("SE Oasis", "https://nomad-hzb-se.de/nomad-oasis/api/v1"),
    ("CE Oasis", "https://nomad-hzb-ce.de/nomad-oasis/api/v1"),
    ("Sol-AI Oasis", "https://nomad-sol-ai.de/nomad-oasis/api/v1"),
];

/// Default deployment when neither a URL nor an Oasis name is configured.
pub const DEFAULT_OASIS: &str = "SE Oasis";

/// Resolve an Oasis name to its API base URL.
pub fn oasis_url(name: &str) -> Option<&'static str> {
    OASIS_OPTIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, url)| *url)
}

/// Credentials for one run.
#[derive(Clone)]
pub enum Credentials {
    /// A ready-to-use access token.
    Token(String),
    /// Username/password, exchanged for a token at client construction.
    Basic { username: String, password: String },
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// `NOMAD_CLIENT_ACCESS_TOKEN` wins over `NOMAD_USERNAME`/`NOMAD_PASSWORD`.
    /// Returns `None` when neither is set; interactive prompting is the
    /// caller's concern.
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                return Some(Self::Token(token));
            }
        }
        match (std::env::var(USERNAME_ENV), std::env::var(PASSWORD_ENV)) {
            (Ok(username), Ok(password)) if !username.is_empty() => {
                Some(Self::Basic { username, password })
            }
            _ => None,
        }
    }

    /// Turn these credentials into a bearer token for `base_url`.
    pub(crate) fn acquire_token(&self, base_url: &str) -> Result<String, ApiError> {
        match self {
            Self::Token(token) => Ok(token.clone()),
            Self::Basic { username, password } => get_token(base_url, username, password),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets deliberately omitted
        match self {
            Self::Token(_) => f.write_str("Credentials::Token(..)"),
            Self::Basic { username, .. } => f
                .debug_struct("Credentials::Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// Optional base-URL override from the environment.
pub fn base_url_from_env() -> Option<String> {
    std::env::var(BASE_URL_ENV).ok().filter(|url| !url.is_empty())
}

/// Exchange username/password for an access token
/// (`GET auth/token?username=..&password=..`).
///
/// Any rejection here is an authentication failure, whatever the status code.
pub fn get_token(base_url: &str, username: &str, password: &str) -> Result<String, ApiError> {
    let url = format!("{}/auth/token", base_url.trim_end_matches('/'));

    let result: Result<String, reqwest::Error> = client::block_on(async {
        let resp = client::http()
            .get(&url)
            .query(&[("username", username), ("password", password)])
            .send()
            .await?
            .error_for_status()?;
        resp.text().await
    });

    let text = result.map_err(|e| ApiError::Auth {
        status: e.status().map(|s| s.as_u16()),
        message: e.to_string(),
    })?;

    let body: Value = serde_json::from_str(&text)
        .map_err(|e| ApiError::data_format(format!("token response is not valid JSON: {e}")))?;
    body.get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::auth("access token not found in response"))
}

/// Authenticate and verify in one step: build a client and confirm the token
/// against `users/me`. Returns the client together with the user info.
pub fn authenticate(
    base_url: &str,
    credentials: &Credentials,
) -> Result<(NomadClient, Value), ApiError> {
    let client = NomadClient::new(base_url, credentials)?;
    let user = client.me()?;
    Ok((client, user))
}
