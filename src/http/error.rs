use super::ServiceKind;
use thiserror::Error;

/// Errors produced by the *arr API clients.
#[derive(Debug, Error)]
pub enum ArrError {
    /// The request never produced an HTTP response (DNS, refused connection,
    /// TLS, broken body stream).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{service} API error: {status} {status_text}: {body}")]
    Api {
        service: ServiceKind,
        status: u16,
        status_text: String,
        body: String,
    },

    /// The service answered successfully but the body didn't match the
    /// expected shape.
    #[error("failed to decode {service} response: {source}")]
    Decode {
        service: ServiceKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ArrError {
    /// HTTP status of an [`ArrError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ArrError::Api { status, .. } => Some(*status),
            ArrError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ArrError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        ArrError::InvalidConfig(format!("invalid header value: {err}"))
    }
}

impl From<reqwest::header::InvalidHeaderName> for ArrError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        ArrError::InvalidConfig(format!("invalid header name: {err}"))
    }
}
