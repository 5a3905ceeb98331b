//! Errors produced while talking to the Jira REST API.

/// Failure of a single call to Jira.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("{0}")]
    Client(String),

    /// The request never produced a response (connection, DNS or TLS failure).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Jira answered with a status code other than the one the endpoint documents.
    #[error("Jira returned status code {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    /// A response arrived but its body could not be read to the end.
    #[error("Can't read response from {endpoint}: {source}")]
    Body {
        endpoint: String,
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not match the expected JSON shape.
    #[error("Can't decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status code associated with this failure, or `-1` when no response
    /// was received at all.
    pub fn status_code(&self) -> i32 {
        match self {
            ApiError::UnexpectedStatus { status, .. } | ApiError::Body { status, .. } => {
                i32::from(*status)
            }
            ApiError::Transport(e) => e.status().map(|s| i32::from(s.as_u16())).unwrap_or(-1),
            ApiError::Decode { .. } => 200,
            ApiError::Client(_) => -1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_of_unexpected_status() {
        let err = ApiError::UnexpectedStatus {
            endpoint: "/rest/api/2/reindex".to_string(),
            status: 500,
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Jira returned status code 500");
    }

    #[test]
    fn test_status_code_of_decode_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::Decode {
            endpoint: "/rest/api/2/reindex/progress".to_string(),
            source,
        };
        assert_eq!(err.status_code(), 200);
        assert!(err.to_string().starts_with("Can't decode response from /rest/api/2/reindex/progress"));
    }

    #[test]
    fn test_status_code_of_client_error() {
        assert_eq!(ApiError::Client("boom".into()).status_code(), -1);
    }
}
