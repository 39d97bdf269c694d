//! Error type for dashboard API calls

use std::fmt;

/// Errors that can occur when talking to the dashboard API
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Base URL or endpoint could not be built
    InvalidUrl(String),
    /// Connection refused, DNS failure, broken pipe...
    Network(String),
    /// Request exceeded the configured timeout
    Timeout,
    /// Server answered with a non-2xx status
    Status { status: u16, message: String },
    /// Response body was not the expected JSON
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(msg) => write!(f, "Invalid API URL: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Status { status, message } => {
                if message.is_empty() {
                    write!(f, "API error ({})", status)
                } else {
                    write!(f, "API error ({}): {}", status, message)
                }
            }
            Self::Decode(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl ApiError {
    /// Message suitable for a toast
    ///
    /// Server-provided messages are shown verbatim; an empty one falls back
    /// to `fallback`.
    pub fn toast_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Status { .. } => fallback.to_string(),
            Self::Network(_) => "Dashboard API unreachable".to_string(),
            other => other.to_string(),
        }
    }
}
