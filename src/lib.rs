//! # offline-dl
//!
//! Download-task dispatcher library for cloud offline-download services.
//!
//! Given an episode's metadata and one of several magnet-bearing inputs — a
//! raw magnet string, a `.torrent` file, a zero-byte hash-named placeholder,
//! or a text file containing a magnet line — the dispatcher derives a valid
//! magnet URI, submits an "add offline download" task to a remote
//! task-management endpoint, and collapses the result into the boolean
//! signal an upstream scheduler consumes.
//!
//! ## Design Philosophy
//!
//! - **Fail closed, never loud** - Every failure (configuration, resolution,
//!   transport, upstream rejection) becomes a caller-visible `false`; no
//!   error escapes the backend boundary
//! - **Auditable resolution** - Magnet resolution is a priority-ordered list
//!   of predicate/handler steps, testable in isolation
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Honest no-ops** - Operations this backend cannot observe locally
//!   report no-op success instead of faking state
//!
//! ## Quick Start
//!
//! ```no_run
//! use offline_dl::{AdapterConfig, DownloadBackend, DownloadRequest, MagnetSource, OfflineDispatcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dispatcher = OfflineDispatcher::new();
//!
//!     let configured = dispatcher
//!         .configure(AdapterConfig::new(
//!             "http://localhost:8000/offline",
//!             "secret-token",
//!         ))
//!         .await;
//!     assert!(configured);
//!
//!     let request = DownloadRequest::new(
//!         "Frieren",
//!         MagnetSource::RawMagnet("magnet:?xt=urn:btih:deadbeef".into()),
//!     )
//!     .with_episode_title("Frieren S01E05");
//!
//!     if dispatcher.submit_download(&request).await {
//!         println!("task accepted");
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Dispatcher facade and backend trait
pub mod dispatcher;
/// Error types
pub mod error;
/// Magnet URI resolution
pub mod magnet;
/// Remote task submission and response classification
pub mod submitter;
/// Info-hash extraction seam for `.torrent` artifacts
pub mod torrent;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::AdapterConfig;
pub use dispatcher::{DownloadBackend, OfflineDispatcher};
pub use error::{Error, Result};
pub use magnet::MagnetResolver;
pub use submitter::TaskSubmitter;
pub use torrent::{InfoHashExtractor, NoOpInfoHashExtractor};
pub use types::{DownloadRequest, MagnetSource, MagnetUri, SubmissionOutcome, TaskInfo};
