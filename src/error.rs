//! Error types for the Parley gateway

use thiserror::Error;

/// Result type alias for Parley operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Parley gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Agent error
    #[error("agent error: {0}")]
    Agent(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Category of an upstream (vendor) failure, derived from the error text
///
/// Used to pick a user-facing message for 500-level responses. There is no
/// retry or circuit-breaking: failures are surfaced immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    Auth,
    Timeout,
    RateLimit,
    Generic,
}

impl UpstreamKind {
    /// Classify an upstream failure by substring match over its display text
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("401")
            || lower.contains("403")
            || lower.contains("unauthorized")
            || lower.contains("forbidden")
            || lower.contains("api key")
            || lower.contains("invalid_grant")
        {
            Self::Auth
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("429")
            || lower.contains("rate limit")
            || lower.contains("too many requests")
        {
            Self::RateLimit
        } else {
            Self::Generic
        }
    }

    /// Human-readable message for the classified failure
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Auth => "Authentication with the upstream service failed",
            Self::Timeout => "The upstream service took too long to respond",
            Self::RateLimit => "The upstream service is rate limiting requests",
            Self::Generic => "The upstream service returned an error",
        }
    }

    /// Stable machine-readable code for the classified failure
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Auth => "upstream_auth",
            Self::Timeout => "upstream_timeout",
            Self::RateLimit => "upstream_rate_limit",
            Self::Generic => "upstream_error",
        }
    }
}
