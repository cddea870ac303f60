//! The periodic fetch → annotate → write loop.
//!
//! Runs on a fixed `tokio::time::interval` until cancelled. There is no
//! retry or backoff: any failure is logged and the loop simply carries on
//! with the next item (or the next tick). Each image is processed end to
//! end before the next one starts; nothing is shared between items except
//! read-only configuration.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use inspecta_client::{ClientError, FileRef, InspectionApi, Workcenter};
use inspecta_core::{annotate, metadata};

use crate::store::Store;

/// Default polling interval in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default number of recent files fetched per workcenter per tick.
const DEFAULT_RECENT_FILES_LIMIT: usize = 5;

/// Poller settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Seconds between sync passes (default: `30`).
    pub poll_interval: Duration,
    /// Recent files fetched per workcenter per pass (default: `5`).
    pub recent_files_limit: usize,
}

impl PollerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `POLL_INTERVAL_SECS` | `30`    |
    /// | `RECENT_FILES_LIMIT` | `5`     |
    pub fn from_env() -> Self {
        let poll_interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let recent_files_limit: usize = std::env::var("RECENT_FILES_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RECENT_FILES_LIMIT);

        Self {
            poll_interval: Duration::from_secs(poll_interval_secs),
            recent_files_limit,
        }
    }
}

/// Run the polling loop until `cancel` is triggered.
pub async fn run(api: InspectionApi, store: Store, config: PollerConfig, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = config.poll_interval.as_secs(),
        limit = config.recent_files_limit,
        root = %store.root().display(),
        "Inspection poller started"
    );

    let mut interval = tokio::time::interval(config.poll_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Inspection poller stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = sync_once(&api, &store, config.recent_files_limit).await {
                    tracing::error!(error = %e, "Sync pass failed");
                }
            }
        }
    }
}

/// One full sync pass over all workcenters.
///
/// Only the initial workcenter listing can fail the pass as a whole;
/// everything below that is per-item and logged-and-skipped.
pub async fn sync_once(api: &InspectionApi, store: &Store, limit: usize) -> Result<(), ClientError> {
    let workcenters = api.list_workcenters().await?;

    for workcenter in &workcenters {
        if let Err(e) = sync_workcenter(api, store, workcenter, limit).await {
            tracing::error!(
                workcenter = %workcenter.name,
                error = %e,
                "Workcenter sync failed"
            );
        }
    }

    Ok(())
}

/// Sync the most recent files of a single workcenter.
async fn sync_workcenter(
    api: &InspectionApi,
    store: &Store,
    workcenter: &Workcenter,
    limit: usize,
) -> Result<(), ClientError> {
    let dir = store.workcenter_dir(&workcenter.name);
    if let Err(e) = store.ensure_dir(&dir) {
        tracing::error!(dir = %dir.display(), error = %e, "Cannot create workcenter directory");
        return Ok(());
    }

    let files = api.list_recent_files(workcenter, limit).await?;

    for file in &files {
        // Skip-if-exists before any fetching or rendering: the annotator
        // is never invoked for a path that is already stored.
        let path = store.image_path(&workcenter.name, &file.id);
        if path.exists() {
            continue;
        }

        if let Err(e) = process_file(api, store, file, &path).await {
            tracing::warn!(file_id = %file.id, error = %e, "Skipping file");
        }
    }

    Ok(())
}

/// Fetch, annotate, and store a single image end to end.
async fn process_file(
    api: &InspectionApi,
    store: &Store,
    file: &FileRef,
    path: &std::path::Path,
) -> Result<(), PipelineError> {
    let image_bytes = api.download(file).await?;
    let annotations = api.labels(file).await?;
    let result = metadata::result_label(&file.user_metadata);

    let annotated = annotate(&image_bytes, &annotations, &result)?;
    store.write_if_absent(path, &annotated)?;

    tracing::info!(
        path = %path.display(),
        labels = annotations.labels.len(),
        "Annotated and stored inspection image"
    );
    Ok(())
}

/// Per-file pipeline failure: any of fetch, render, or write.
#[derive(Debug, thiserror::Error)]
enum PipelineError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Render(#[from] inspecta_core::CoreError),

    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
