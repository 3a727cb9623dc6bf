//! Magnet URI resolution from heterogeneous download inputs
//!
//! Feeds hand over download requests in four shapes: a raw magnet string, a
//! real `.torrent` file, a zero-byte placeholder file named after the
//! info-hash, or a plain-text file containing a magnet line. Resolution runs
//! a priority-ordered list of predicate/handler steps over the request; the
//! first step whose predicate matches decides the outcome, so the tie-break
//! order stays auditable and testable in isolation.

use crate::error::{Error, Result};
use crate::torrent::InfoHashExtractor;
use crate::types::{DownloadRequest, MagnetSource, MagnetUri};
use std::path::Path;
use std::sync::Arc;

/// Resolves exactly one magnet URI per download request, or fails explicitly
///
/// Pure with respect to the request: no retries, no caching, no state beyond
/// the installed [`InfoHashExtractor`] collaborator. Local filesystem errors
/// are immediate failures, not transient ones.
pub struct MagnetResolver {
    extractor: Arc<dyn InfoHashExtractor>,
}

/// Flattened view of a request's magnet source
///
/// The priority chain runs over the raw candidate and the file path rather
/// than the source variant: a `TorrentFile` pointing at a zero-byte
/// hash-named file must fall through to the placeholder rule, because some
/// upstream producers materialize exactly that.
struct ResolveInputs<'a> {
    raw_magnet: Option<&'a str>,
    file_path: Option<&'a Path>,
}

impl<'a> From<&'a MagnetSource> for ResolveInputs<'a> {
    fn from(source: &'a MagnetSource) -> Self {
        match source {
            MagnetSource::RawMagnet(raw) => Self {
                raw_magnet: Some(raw),
                file_path: None,
            },
            MagnetSource::TorrentFile(path)
            | MagnetSource::PlaceholderHashFile(path)
            | MagnetSource::TextFile(path) => Self {
                raw_magnet: None,
                file_path: Some(path),
            },
        }
    }
}

/// One resolution step: `Ok(None)` means the predicate did not match and the
/// chain continues; `Ok(Some(_))` and `Err(_)` are both terminal.
type Step = fn(&MagnetResolver, &ResolveInputs<'_>) -> Result<Option<MagnetUri>>;

impl MagnetResolver {
    /// Resolution steps in priority order; first match wins
    const STEPS: &'static [(&'static str, Step)] = &[
        ("raw-magnet", Self::step_raw_magnet),
        ("torrent-file", Self::step_torrent_file),
        ("placeholder-hash", Self::step_placeholder_hash),
        ("text-file", Self::step_text_file),
    ];

    /// Create a resolver with the given info-hash extractor collaborator
    pub fn new(extractor: Arc<dyn InfoHashExtractor>) -> Self {
        Self { extractor }
    }

    /// Resolve a magnet URI for the request, or fail with a resolution error
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`] when no step yields a magnet URI, and
    /// [`Error::Io`] when reading a text artifact fails. Never panics.
    pub fn resolve(&self, request: &DownloadRequest) -> Result<MagnetUri> {
        let inputs = ResolveInputs::from(&request.magnet_source);

        for (step_name, step) in Self::STEPS {
            if let Some(uri) = step(self, &inputs)? {
                tracing::debug!(
                    step = step_name,
                    magnet = uri.preview(),
                    "magnet URI resolved"
                );
                return Ok(uri);
            }
        }

        Err(inputs.failure())
    }

    /// Step 1: accept a raw string that already is a magnet URI, trimmed
    fn step_raw_magnet(&self, inputs: &ResolveInputs<'_>) -> Result<Option<MagnetUri>> {
        Ok(inputs.raw_magnet.and_then(MagnetUri::parse))
    }

    /// Step 2: hand a real, non-empty `.torrent` file to the extractor
    fn step_torrent_file(&self, inputs: &ResolveInputs<'_>) -> Result<Option<MagnetUri>> {
        let Some(path) = inputs.file_path else {
            return Ok(None);
        };
        let Ok(meta) = path.metadata() else {
            return Ok(None);
        };
        if !meta.is_file() || meta.len() == 0 || !has_extension(path, "torrent") {
            return Ok(None);
        }

        let extracted = self.extractor.extract_magnet(path);
        match extracted.as_deref().and_then(MagnetUri::parse) {
            Some(uri) => {
                tracing::info!(
                    file = %path.display(),
                    extractor = self.extractor.name(),
                    magnet = uri.preview(),
                    "magnet URI extracted from torrent file"
                );
                Ok(Some(uri))
            }
            None => {
                tracing::warn!(
                    file = %path.display(),
                    extractor = self.extractor.name(),
                    extracted = extracted.as_deref().unwrap_or(""),
                    "torrent file yielded no usable magnet URI"
                );
                Err(inputs.failure())
            }
        }
    }

    /// Step 3: treat a zero-byte non-txt file's base name as the info-hash
    fn step_placeholder_hash(&self, inputs: &ResolveInputs<'_>) -> Result<Option<MagnetUri>> {
        let Some(path) = inputs.file_path else {
            return Ok(None);
        };
        let Ok(meta) = path.metadata() else {
            return Ok(None);
        };
        if !meta.is_file() || meta.len() != 0 || has_extension(path, "txt") {
            return Ok(None);
        }

        let Some(hash) = path.file_stem().and_then(|stem| stem.to_str()) else {
            return Ok(None);
        };
        if hash.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(MagnetUri::from_info_hash(hash)))
    }

    /// Step 4: scan a `.txt` file for the first magnet line
    fn step_text_file(&self, inputs: &ResolveInputs<'_>) -> Result<Option<MagnetUri>> {
        let Some(path) = inputs.file_path else {
            return Ok(None);
        };
        let Ok(meta) = path.metadata() else {
            return Ok(None);
        };
        if !meta.is_file() || !has_extension(path, "txt") {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let magnet_line = content
            .split(['\r', '\n'])
            .find(|line| line.trim().to_lowercase().starts_with("magnet:"));
        match magnet_line.and_then(MagnetUri::parse) {
            Some(uri) => Ok(Some(uri)),
            None => {
                tracing::warn!(
                    file = %path.display(),
                    "text file contains no magnet line"
                );
                Err(inputs.failure())
            }
        }
    }
}

impl ResolveInputs<'_> {
    /// Resolution failure carrying every attempted input for diagnostics
    fn failure(&self) -> Error {
        Error::Resolution {
            magnet_input: self.raw_magnet.map(str::to_string),
            file_path: self.file_path.map(Path::to_path_buf),
        }
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}
