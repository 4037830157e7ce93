//! # Client Error Types
//!
//! Error types for configuration, transport and backend operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ClientError                                     │
//! │                                                                         │
//! │  Configuration          Transport              Backend payloads         │
//! │  ─────────────          ─────────              ────────────────         │
//! │  InvalidConfig          RequestFailed          DecodeFailed             │
//! │  InvalidUrl             Timeout                Core(CoreError)          │
//! │  ConfigLoadFailed       HttpStatus                                      │
//! │  ConfigSaveFailed                                                       │
//! │                                                                         │
//! │  None of these reach the UI directly: the CartStore logs them and       │
//! │  replaces them with its fixed fetch/checkout advisory messages.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every backend and configuration failure.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request could not be sent or the connection broke.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The backend did not answer in time.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("Backend responded with HTTP {0}")]
    HttpStatus(u16),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// The response body was not valid JSON.
    #[error("Failed to decode response: {0}")]
    DecodeFailed(String),

    /// The response was JSON but not a usable cart or confirmation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if let Some(status) = err.status() {
            ClientError::HttpStatus(status.as_u16())
        } else if err.is_decode() {
            ClientError::DecodeFailed(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidConfig(err.to_string())
        } else {
            ClientError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DecodeFailed(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if trying the same request again might succeed.
    ///
    /// The store never retries on its own; this is for callers deciding
    /// whether to offer a "try again" button.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::RequestFailed(_) | ClientError::Timeout => true,
            ClientError::HttpStatus(status) => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::RequestFailed("connection reset".into()).is_retryable());
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::HttpStatus(503).is_retryable());
        assert!(ClientError::HttpStatus(429).is_retryable());

        assert!(!ClientError::HttpStatus(404).is_retryable());
        assert!(!ClientError::DecodeFailed("eof".into()).is_retryable());
        assert!(!ClientError::Core(CoreError::MissingOrderId).is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(ClientError::InvalidUrl("nope".into()).is_config_error());
        assert!(!ClientError::Timeout.is_config_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ClientError::HttpStatus(500).to_string(), "Backend responded with HTTP 500");
        assert_eq!(
            ClientError::Core(CoreError::LineNotFound(3)).to_string(),
            "Cart line not found: 3"
        );
    }
}
