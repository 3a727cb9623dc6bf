//! Offline download dispatcher facade
//!
//! Composes the magnet resolver and the task submitter behind the operation
//! set the upstream scheduler expects. Every failure anywhere collapses to a
//! boolean `false`; nothing panics and no error escapes the boundary.
//! Operations this backend has no local concept of (listing, deletion,
//! renaming, tagging, trackers, save paths) report no-op success, so the
//! scheduler never mistakes a missing capability for a failure.

use crate::config::AdapterConfig;
use crate::magnet::MagnetResolver;
use crate::submitter::TaskSubmitter;
use crate::torrent::{InfoHashExtractor, NoOpInfoHashExtractor};
use crate::types::{DownloadRequest, TaskInfo};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Operation set a download backend exposes to the upstream scheduler
///
/// Booleans, not errors: the scheduler consumes a single success signal per
/// operation, and a backend without a local notion of an operation reports
/// no-op success rather than failing the pipeline.
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    /// Install and validate a configuration snapshot; performs no network I/O
    async fn configure(&self, config: AdapterConfig) -> bool;

    /// Resolve the request's magnet URI and submit it as an offline task
    async fn submit_download(&self, request: &DownloadRequest) -> bool;

    /// Tasks observable by this backend (always empty here)
    async fn list_tasks(&self) -> Vec<TaskInfo>;

    /// Delete a task; no-op success for this backend
    async fn delete_task(&self, task: &TaskInfo, delete_files: bool) -> bool;

    /// Rename a task; no-op for this backend
    async fn rename_task(&self, task: &TaskInfo);

    /// Tag a task; no-op success for this backend
    async fn add_tags(&self, task: &TaskInfo, tags: &str) -> bool;

    /// Replace tracker lists; no-op for this backend
    async fn update_trackers(&self, trackers: &[String]);

    /// Move a task's save path; no-op for this backend
    async fn set_save_path(&self, task: &TaskInfo, save_path: &str);
}

/// Dispatcher for a remote offline-download service
///
/// The submitter (configuration plus HTTP client) lives behind an atomic
/// snapshot swap: `configure` replaces the whole snapshot while concurrent
/// submissions keep the one they started with, so hot-reload never tears a
/// reader. Unconfigured dispatchers reject every submission before any
/// network I/O.
pub struct OfflineDispatcher {
    resolver: MagnetResolver,
    submitter: RwLock<Option<Arc<TaskSubmitter>>>,
}

impl OfflineDispatcher {
    /// Create an unconfigured dispatcher without `.torrent` parsing support
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(NoOpInfoHashExtractor))
    }

    /// Create an unconfigured dispatcher with the given info-hash extractor
    pub fn with_extractor(extractor: Arc<dyn InfoHashExtractor>) -> Self {
        Self {
            resolver: MagnetResolver::new(extractor),
            submitter: RwLock::new(None),
        }
    }

    /// Like [`DownloadBackend::submit_download`], racing the caller's
    /// cancellation signal; cancellation is reported as a plain failure
    pub async fn submit_download_cancellable(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
    ) -> bool {
        let Some(submitter) = self.snapshot().await else {
            tracing::error!("offline dispatcher is not configured, rejecting submission");
            return false;
        };
        let Some(magnet) = self.resolve_logged(request) else {
            return false;
        };
        submitter
            .submit_cancellable(&magnet, request.display_name(), cancel)
            .await
            .is_accepted()
    }

    async fn snapshot(&self) -> Option<Arc<TaskSubmitter>> {
        self.submitter.read().await.clone()
    }

    fn resolve_logged(&self, request: &DownloadRequest) -> Option<crate::types::MagnetUri> {
        match self.resolver.resolve(request) {
            Ok(magnet) => Some(magnet),
            Err(e) => {
                tracing::error!(
                    series = request.series_title,
                    task = request.display_name(),
                    error = %e,
                    "magnet resolution failed"
                );
                None
            }
        }
    }
}

impl Default for OfflineDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownloadBackend for OfflineDispatcher {
    async fn configure(&self, config: AdapterConfig) -> bool {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "offline dispatcher configuration rejected");
            return false;
        }

        let endpoint = config.endpoint_url.clone();
        let folder = config.default_folder_id.clone();
        let submitter = match TaskSubmitter::new(Arc::new(config)) {
            Ok(submitter) => submitter,
            Err(e) => {
                tracing::error!(error = %e, "failed to build HTTP transport");
                return false;
            }
        };

        *self.submitter.write().await = Some(Arc::new(submitter));

        tracing::info!(endpoint, "offline dispatcher configured");
        match folder {
            Some(folder_id) => tracing::info!(folder_id, "default download folder configured"),
            None => tracing::info!("no default folder configured, remote default applies"),
        }
        true
    }

    async fn submit_download(&self, request: &DownloadRequest) -> bool {
        let Some(submitter) = self.snapshot().await else {
            tracing::error!("offline dispatcher is not configured, rejecting submission");
            return false;
        };
        let Some(magnet) = self.resolve_logged(request) else {
            return false;
        };
        submitter
            .submit(&magnet, request.display_name())
            .await
            .is_accepted()
    }

    async fn list_tasks(&self) -> Vec<TaskInfo> {
        tracing::debug!("list_tasks is a no-op for the offline backend");
        Vec::new()
    }

    async fn delete_task(&self, task: &TaskInfo, delete_files: bool) -> bool {
        tracing::debug!(
            task_id = task.id,
            delete_files,
            "delete_task is a no-op for the offline backend"
        );
        true
    }

    async fn rename_task(&self, task: &TaskInfo) {
        tracing::debug!(task_id = task.id, "rename_task is a no-op for the offline backend");
    }

    async fn add_tags(&self, task: &TaskInfo, tags: &str) -> bool {
        tracing::debug!(
            task_id = task.id,
            tags,
            "add_tags is a no-op for the offline backend"
        );
        true
    }

    async fn update_trackers(&self, trackers: &[String]) {
        tracing::debug!(
            count = trackers.len(),
            "update_trackers is a no-op for the offline backend"
        );
    }

    async fn set_save_path(&self, task: &TaskInfo, save_path: &str) {
        tracing::debug!(
            task_id = task.id,
            save_path,
            "set_save_path is a no-op for the offline backend"
        );
    }
}
