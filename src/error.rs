//! Error types for newshub
//!
//! This module provides error handling for the library:
//! - A single opaque fetch error for everything that goes wrong against the
//!   upstream news API (transport failures, non-success HTTP statuses,
//!   undecodable bodies, API-level rejections)
//! - A configuration error with context about which setting is invalid
//!
//! The fetch path deliberately does not distinguish network failures from
//! authentication failures or rate limiting. Consumers get one error kind
//! carrying a human-readable message suitable for display next to a reload
//! control.

use thiserror::Error;

/// Result type alias for newshub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for newshub
#[derive(Debug, Error)]
pub enum Error {
    /// A page fetch against the news API failed
    ///
    /// Covers transport errors, non-2xx responses, malformed response bodies,
    /// and responses the API itself marks as failed. The message is the most
    /// useful one available (the upstream `message` field when the API
    /// returned one).
    #[error("fetch failed: {message}")]
    Fetch {
        /// Human-readable description of the failure
        message: String,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api_key")
        key: Option<String>,
    },
}

impl Error {
    /// Create a fetch error from any displayable message
    pub fn fetch(message: impl Into<String>) -> Self {
        Error::Fetch {
            message: message.into(),
        }
    }

    /// Create a configuration error for a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Fetch {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Fetch {
            message: format!("invalid response body: {err}"),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Display formatting
    // -----------------------------------------------------------------------

    #[test]
    fn fetch_error_display_includes_message() {
        let err = Error::fetch("connection refused");
        assert_eq!(err.to_string(), "fetch failed: connection refused");
    }

    #[test]
    fn config_error_display_includes_message() {
        let err = Error::config("api_key must not be empty", "api_key");
        assert_eq!(
            err.to_string(),
            "configuration error: api_key must not be empty"
        );
    }

    #[test]
    fn config_error_without_key_formats_the_same() {
        let err = Error::Config {
            message: "bad value".into(),
            key: None,
        };
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    // -----------------------------------------------------------------------
    // Conversions: everything on the fetch path collapses into Error::Fetch
    // -----------------------------------------------------------------------

    #[test]
    fn reqwest_error_converts_to_fetch() {
        // A request built against a relative URL fails synchronously, which
        // gives us a real reqwest::Error without any network involvement.
        let reqwest_err = reqwest::Client::new()
            .get("not-a-url")
            .build()
            .expect_err("relative URL should fail to build");

        let err: Error = reqwest_err.into();
        assert!(
            matches!(err, Error::Fetch { .. }),
            "reqwest errors must map to the single fetch error kind, got {err:?}"
        );
    }

    #[test]
    fn serde_json_error_converts_to_fetch_with_context() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ not json")
            .expect_err("malformed JSON should fail to parse");

        let err: Error = json_err.into();
        match err {
            Error::Fetch { message } => {
                assert!(
                    message.starts_with("invalid response body:"),
                    "decode failures should identify themselves, got: {message}"
                );
            }
            other => panic!("expected Error::Fetch, got {other:?}"),
        }
    }

    #[test]
    fn fetch_helper_accepts_string_and_str() {
        let from_str = Error::fetch("boom");
        let from_string = Error::fetch(String::from("boom"));
        assert_eq!(from_str.to_string(), from_string.to_string());
    }
}
