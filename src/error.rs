//! Error types for offline-dl
//!
//! This module provides the error taxonomy for the adapter:
//! - Configuration errors (missing endpoint or token)
//! - Resolution errors (no magnet URI derivable from the supplied inputs)
//! - Protocol errors (transport failures, malformed or unexpected responses)
//! - Upstream rejections (the remote service understood the request but declined it)
//!
//! All variants collapse to a boolean failure signal at the [`crate::DownloadBackend`]
//! boundary; the structured variants exist for diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for offline-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for offline-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (blank endpoint, blank token, unparseable URL)
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
    },

    /// No magnet URI could be resolved from the supplied inputs
    ///
    /// Carries both raw inputs the resolver attempted so the failure is
    /// diagnosable from logs alone.
    #[error("no magnet URI resolved (magnet input: {magnet_input:?}, file: {file_path:?})")]
    Resolution {
        /// The caller-supplied magnet candidate, if any
        magnet_input: Option<String>,
        /// The local artifact path the resolver examined, if any
        file_path: Option<PathBuf>,
    },

    /// Network error (connection refused, timeout, interrupted transfer)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error while reading a local torrent artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Protocol error: non-200 status, blank body, or unexpected response shape
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The remote service declined the task (quota, invalid magnet, duplicate)
    #[error("upstream rejected task: {code} ({})", .description.as_deref().unwrap_or("no description"))]
    UpstreamRejected {
        /// Machine-readable error code passed through from the wrapped service
        code: String,
        /// Human-readable description, when the upstream supplied one
        description: Option<String>,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_message() {
        let err = Error::Config {
            message: "endpoint URL is blank".into(),
        };
        assert_eq!(err.to_string(), "configuration error: endpoint URL is blank");
    }

    #[test]
    fn resolution_error_display_includes_both_inputs() {
        let err = Error::Resolution {
            magnet_input: Some("not-a-magnet".into()),
            file_path: Some(PathBuf::from("/tmp/ep01.torrent")),
        };
        let msg = err.to_string();
        assert!(msg.contains("not-a-magnet"));
        assert!(msg.contains("ep01.torrent"));
    }

    #[test]
    fn resolution_error_display_tolerates_absent_inputs() {
        let err = Error::Resolution {
            magnet_input: None,
            file_path: None,
        };
        assert!(err.to_string().contains("None"));
    }

    #[test]
    fn upstream_rejected_display_with_description() {
        let err = Error::UpstreamRejected {
            code: "quota_exceeded".into(),
            description: Some("daily limit reached".into()),
        };
        assert_eq!(
            err.to_string(),
            "upstream rejected task: quota_exceeded (daily limit reached)"
        );
    }

    #[test]
    fn upstream_rejected_display_without_description() {
        let err = Error::UpstreamRejected {
            code: "invalid_magnet".into(),
            description: None,
        };
        assert_eq!(
            err.to_string(),
            "upstream rejected task: invalid_magnet (no description)"
        );
    }

    #[test]
    fn io_error_converts_via_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn serde_error_converts_via_from() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
