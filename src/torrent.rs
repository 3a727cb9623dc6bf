//! Info-hash extraction seam for `.torrent` artifacts
//!
//! Binary torrent parsing is outside this crate's scope. The resolver treats
//! the extractor as a black box that either yields a magnet string or
//! nothing; implementations can use a bencode library, an external tool, or
//! provide stub functionality for graceful degradation.

use std::path::Path;

/// Trait for extracting a magnet URI from a `.torrent` file
///
/// Implementations must be cheap to call and side-effect free: the resolver
/// invokes the extractor at most once per submission and validates the
/// returned string itself.
pub trait InfoHashExtractor: Send + Sync {
    /// Extract a magnet URI from the given `.torrent` file
    ///
    /// Returns `None` (or a blank string) when no hash can be extracted;
    /// the resolver converts either into a resolution failure.
    fn extract_magnet(&self, torrent_file: &Path) -> Option<String>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// No-op extractor used when `.torrent` parsing is unavailable
///
/// With this extractor installed, submissions backed by a real (non-empty)
/// `.torrent` file always fail resolution; raw magnets, placeholder hash
/// files, and text files keep working.
pub struct NoOpInfoHashExtractor;

impl InfoHashExtractor for NoOpInfoHashExtractor {
    fn extract_magnet(&self, torrent_file: &Path) -> Option<String> {
        tracing::debug!(
            file = %torrent_file.display(),
            "no info-hash extractor installed, torrent file cannot be resolved"
        );
        None
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
