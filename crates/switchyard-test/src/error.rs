//! Test error types.

use thiserror::Error;

/// Errors that can occur while building a test request or reading a response.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request URI did not parse.
    #[error("invalid URI {uri:?}: {source}")]
    InvalidUri {
        /// The URI as given.
        uri: String,
        /// Parser error.
        #[source]
        source: http::uri::InvalidUri,
    },

    /// A header name or value was rejected.
    #[error("invalid header {0}")]
    InvalidHeader(String),

    /// The `http` request builder failed.
    #[error("request build error: {0}")]
    RequestBuild(#[from] http::Error),

    /// The response body was not what the caller asked for.
    #[error("body read error: {0}")]
    BodyRead(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TestError::InvalidHeader("x bad: value".to_string());
        assert_eq!(err.to_string(), "invalid header x bad: value");

        let err = TestError::BodyRead("Invalid UTF-8".to_string());
        assert_eq!(err.to_string(), "body read error: Invalid UTF-8");
    }

    #[test]
    fn test_json_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TestError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
