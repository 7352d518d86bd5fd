//! Error taxonomy for NOMAD API operations

/// Error from a NOMAD API call.
///
/// Three-way split: credential problems ([`Auth`](Self::Auth)), everything
/// else that went wrong on the wire ([`Transport`](Self::Transport)), and
/// responses that arrived but did not have the expected shape
/// ([`DataFormat`](Self::DataFormat)). None of these are retried anywhere;
/// callers fail fast except for the per-id degrade path in
/// [`resolve_names`](crate::authors::resolve_names).
#[derive(Debug)]
pub enum ApiError {
    /// Credentials missing, or rejected by the server (HTTP 401/403)
    Auth {
        status: Option<u16>,
        message: String,
    },
    /// Network failure or unexpected HTTP status
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// Response arrived but did not have the expected shape
    DataFormat(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth {
                status: Some(s),
                message,
            } => write!(f, "authentication failed (HTTP {s}): {message}"),
            Self::Auth {
                status: None,
                message,
            } => write!(f, "authentication failed: {message}"),
            Self::Transport {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Transport {
                status: None,
                message,
            } => write!(f, "transport error: {message}"),
            Self::DataFormat(message) => write!(f, "unexpected response shape: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Classify a reqwest error: 401/403 are credential rejections,
    /// everything else is a transport failure.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        match status {
            Some(401 | 403) => Self::Auth {
                status,
                message: e.to_string(),
            },
            _ => Self::Transport {
                status,
                message: e.to_string(),
            },
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            status: None,
            message: message.into(),
        }
    }

    pub fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat(message.into())
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Transport { status, .. } => *status,
            Self::DataFormat(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(status: u16) -> ApiError {
        ApiError::Transport {
            status: Some(status),
            message: "test".to_string(),
        }
    }

    #[test]
    fn auth_without_status_displays_message() {
        let err = ApiError::auth("no credentials in environment");
        let msg = format!("{err}");
        assert!(msg.contains("authentication failed"));
        assert!(msg.contains("no credentials"));
    }

    #[test]
    fn transport_displays_status() {
        let msg = format!("{}", transport(502));
        assert!(msg.contains("502"));
    }

    #[test]
    fn data_format_has_no_status() {
        let err = ApiError::data_format("missing 'data' field");
        assert_eq!(err.status(), None);
        assert!(format!("{err}").contains("missing 'data' field"));
    }

    #[test]
    fn is_auth_predicate() {
        assert!(ApiError::auth("x").is_auth());
        assert!(!transport(500).is_auth());
        assert!(!ApiError::data_format("x").is_auth());
    }
}
