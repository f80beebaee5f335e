use std::fmt;

use async_trait::async_trait;

use super::types::{ChatReply, ChatRequest, MemorySnapshot, Participant};

/// Errors that can occur while talking to the meeting backend.
/// None of them are retried; callers surface them and move on.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client misconfigured (unusable base URL, TLS setup failure).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// The request exceeded the configured timeout.
    Timeout,
    /// Backend answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Failed to parse the backend's response body.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// The three endpoints the meeting room talks to.
#[async_trait]
pub trait MeetingBackend: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// `GET /api/team-members`, in the backend's key order.
    async fn team_members(&self) -> Result<Vec<Participant>, ApiError>;

    /// `POST /api/chat`.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    /// `GET /api/member-memory/{name}`.
    async fn member_memory(&self, name: &str) -> Result<MemorySnapshot, ApiError>;
}
