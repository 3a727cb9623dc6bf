//! Core types for offline-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Display name used when neither an episode nor a series title is usable
const UNKNOWN_TASK_NAME: &str = "unknown task";

/// Maximum number of characters of a magnet URI echoed into log output
const MAGNET_PREVIEW_LEN: usize = 70;

/// Where the magnet URI for a submission comes from
///
/// Exactly one source is supplied per request; the resolver applies its
/// priority-ordered rules to whichever raw string or file the source names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MagnetSource {
    /// A raw magnet string handed over by the feed (no file I/O needed)
    RawMagnet(String),
    /// A locally-stored `.torrent` file to hand to the info-hash extractor
    TorrentFile(PathBuf),
    /// A zero-byte file whose base name encodes the info-hash
    PlaceholderHashFile(PathBuf),
    /// A plain-text file containing a magnet line
    TextFile(PathBuf),
}

/// One download submission: episode metadata plus its magnet source
///
/// Immutable; constructed once per submission attempt. Nothing here outlives
/// the call that consumes it.
#[derive(Clone, Debug)]
pub struct DownloadRequest {
    /// Title of the series the episode belongs to
    pub series_title: String,
    /// Episode-specific title; falls back to the series title when absent
    pub episode_title: Option<String>,
    /// Input the magnet URI is resolved from
    pub magnet_source: MagnetSource,
}

impl DownloadRequest {
    /// Create a request with no episode-specific title
    pub fn new(series_title: impl Into<String>, magnet_source: MagnetSource) -> Self {
        Self {
            series_title: series_title.into(),
            episode_title: None,
            magnet_source,
        }
    }

    /// Set the episode-specific title
    #[must_use]
    pub fn with_episode_title(mut self, episode_title: impl Into<String>) -> Self {
        self.episode_title = Some(episode_title.into());
        self
    }

    /// Human-readable task name sent to the remote endpoint
    ///
    /// Prefers the episode title, then the series title, then a fixed
    /// placeholder so the remote task is never unnamed.
    pub fn display_name(&self) -> &str {
        if let Some(title) = &self.episode_title
            && !title.trim().is_empty()
        {
            return title;
        }
        if !self.series_title.trim().is_empty() {
            return &self.series_title;
        }
        UNKNOWN_TASK_NAME
    }
}

/// A validated magnet URI
///
/// Invariant: trimmed, non-empty, and case-insensitively starts with the
/// `magnet:` scheme literal. No further structural validation is performed;
/// downstream consumers do not require a parsed hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MagnetUri(String);

impl MagnetUri {
    /// Parse a candidate string into a magnet URI
    ///
    /// The candidate is trimmed; case and content are otherwise preserved.
    /// Returns `None` when the trimmed string does not start with `magnet:`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        trimmed
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("magnet:"))
            .then(|| Self(trimmed.to_string()))
    }

    /// Build a magnet URI from a bare BitTorrent info-hash
    pub fn from_info_hash(hash: &str) -> Self {
        Self(format!("magnet:?xt=urn:btih:{hash}"))
    }

    /// The full URI as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A log-safe prefix of the URI, truncated on a char boundary
    pub fn preview(&self) -> &str {
        self.0
            .char_indices()
            .nth(MAGNET_PREVIEW_LEN)
            .map_or(self.0.as_str(), |(idx, _)| &self.0[..idx])
    }
}

impl std::fmt::Display for MagnetUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MagnetUri> for String {
    fn from(uri: MagnetUri) -> Self {
        uri.0
    }
}

/// Outcome of one submission to the remote task endpoint
///
/// Produced once per submit call and consumed immediately by the caller as a
/// boolean; no outcome is persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The remote service created an offline download task
    Accepted {
        /// Identifier of the created task
        task_id: String,
    },
    /// The remote service understood the request but declined it
    UpstreamRejected {
        /// Machine-readable error code passed through from the wrapped service
        error_code: String,
        /// Human-readable description, when supplied
        error_description: Option<String>,
    },
    /// Transport failure, timeout, or a response outside the protocol contract
    ProtocolError {
        /// Diagnostic detail for logs
        cause: String,
    },
}

impl SubmissionOutcome {
    /// Whether the submission was accepted by the remote service
    ///
    /// This is the only signal the upstream scheduler consumes; every
    /// non-accepted outcome is a caller-visible failure.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Minimal descriptor of a remote task
///
/// This backend has no locally observable torrent state, so the type exists
/// only for the capability surface the upstream scheduler expects; listings
/// are always empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Remote task identifier
    pub id: String,
    /// Display name of the task
    pub name: String,
}
