//! Error types for pinlens core
//!
//! Provides error handling for:
//! - Record store transport failures and rate limiting
//! - Configuration loading and validation
//! - Dashboard refreshes and view transitions

use pinlens_view::ViewError;
use serde_json::Value;
use std::path::PathBuf;

/// Record store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Non-success response with a human-readable message
    #[error("{message}")]
    Http {
        /// Response status
        status: u16,
        /// Message from the response body, or a fallback
        message: String,
    },

    /// Still rate limited after every retry
    #[error("rate limited after {attempts} attempts")]
    RateLimited {
        /// Requests made for the page
        attempts: u32,
    },

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Connection-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// No bearer credential stored
    #[error("missing credential: set {0}")]
    MissingCredential(String),

    /// Table is not known to the store
    #[error("unknown table: '{0}'")]
    UnknownTable(String),

    /// Record is not known to the store
    #[error("record not found: {table}/{id}")]
    RecordNotFound {
        /// Remote table name
        table: String,
        /// Record id
        id: String,
    },
}

impl StoreError {
    /// Build from a failed response
    ///
    /// Uses `error.message` from a JSON body when present, otherwise
    /// `"Failed to fetch <table>"`. Status 429 becomes a single-attempt
    /// [`StoreError::RateLimited`].
    #[must_use]
    pub fn from_response(table: &str, status: u16, body: &str) -> Self {
        if status == 429 {
            return Self::RateLimited { attempts: 1 };
        }
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                json.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Failed to fetch {table}"));
        Self::Http { status, message }
    }

    /// Check if error is a rate limit
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transport(_))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the config shape
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but are unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create invalid config error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Dashboard errors
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Record store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// View transition rejected
    #[error("view error: {0}")]
    View(#[from] ViewError),

    /// Configuration failed
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl DashboardError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(err) => err.is_retryable(),
            Self::View(_) | Self::Config(_) => false,
        }
    }

    /// Message shown to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_body() {
        let err = StoreError::from_response(
            "Pin Analysis",
            403,
            r#"{"error": {"type": "INVALID_PERMISSIONS", "message": "You are not permitted"}}"#,
        );
        assert_eq!(
            err,
            StoreError::Http {
                status: 403,
                message: "You are not permitted".into()
            }
        );
        assert_eq!(err.to_string(), "You are not permitted");
    }

    #[test]
    fn fallback_message() {
        let err = StoreError::from_response("Pin Analysis", 500, "<html>oops</html>");
        assert_eq!(err.to_string(), "Failed to fetch Pin Analysis");

        let err = StoreError::from_response("content_queue", 404, r#"{"error": "NOT_FOUND"}"#);
        assert_eq!(err.to_string(), "Failed to fetch content_queue");
    }

    #[test]
    fn rate_limit_status() {
        let err = StoreError::from_response("x", 429, "");
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());
    }

    #[test]
    fn dashboard_retryable() {
        let err = DashboardError::from(StoreError::Transport("reset".into()));
        assert!(err.is_retryable());
        let err = DashboardError::from(ViewError::InvalidPageSize(0));
        assert!(!err.is_retryable());
    }

    #[test]
    fn store_message_is_user_facing() {
        let err = DashboardError::from(StoreError::Http {
            status: 401,
            message: "Authentication required".into(),
        });
        assert_eq!(err.user_message(), "Authentication required");
    }
}
