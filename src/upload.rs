//! Chunked upload driver.
//!
//! Partitions collected audio files into bounded batches and submits them
//! strictly in order, blocking on the remote readiness signal between
//! batches. Readiness is a bounded poll, never an open-ended wait: a UI
//! that never settles must not hang the run.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// One bounded group of files submitted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    pub files: Vec<PathBuf>,
}

/// Partition `files` into batches of at most `size`, preserving order.
///
/// Concatenating the batches reproduces the input exactly.
pub fn chunk(files: &[PathBuf], size: usize) -> Vec<UploadBatch> {
    debug_assert!(size > 0, "chunk size validated at config load");
    files
        .chunks(size.max(1))
        .map(|group| UploadBatch {
            files: group.to_vec(),
        })
        .collect()
}

/// Bounds for the readiness poll.
#[derive(Debug, Clone, Copy)]
pub struct WaitSettings {
    pub processing_timeout: Duration,
    pub poll_interval: Duration,
}

/// What the upload driver needs from the remote playlist editor.
#[allow(async_fn_in_trait)]
pub trait UploadSurface {
    /// Hand one batch of local file paths to the remote upload control.
    async fn submit_files(&self, files: &[PathBuf]) -> Result<()>;

    /// Whether the remote readiness signal is currently observable
    /// (the save control has become enabled).
    async fn processing_complete(&self) -> Result<bool>;

    /// Remote status text worth relaying while waiting, if any.
    async fn processing_hint(&self) -> Option<String>;
}

/// Submit every batch in order, waiting for readiness after each one.
///
/// A batch that never signals readiness stops the run with
/// [`Error::StillProcessing`]; later batches are not submitted.
pub async fn upload_all<S: UploadSurface>(
    surface: &S,
    files: &[PathBuf],
    chunk_size: usize,
    wait: WaitSettings,
) -> Result<()> {
    let batches = chunk(files, chunk_size);
    let total = batches.len();

    for (i, batch) in batches.iter().enumerate() {
        let n = i + 1;
        info!(
            "uploading batch {n} of {total} ({} files)",
            batch.files.len()
        );
        surface.submit_files(&batch.files).await?;

        if !wait_until_ready(surface, wait).await? {
            return Err(Error::StillProcessing {
                batch: n,
                waited_secs: wait.processing_timeout.as_secs(),
            });
        }
        info!("batch {n} of {total} processed");
    }

    Ok(())
}

/// Poll the readiness signal until it turns true or the bound elapses.
///
/// Returns `Ok(false)` on timeout; the caller decides whether that is
/// fatal (upload mode) or merely worth a warning (icon mode).
pub async fn wait_until_ready<S: UploadSurface>(surface: &S, wait: WaitSettings) -> Result<bool> {
    let start = Instant::now();

    loop {
        if surface.processing_complete().await? {
            debug!("readiness signal observed after {:?}", start.elapsed());
            return Ok(true);
        }

        if start.elapsed() >= wait.processing_timeout {
            warn!(
                "readiness signal not observed within {}s",
                wait.processing_timeout.as_secs()
            );
            return Ok(false);
        }

        info!(
            "waiting for remote processing... ({}s elapsed)",
            start.elapsed().as_secs()
        );
        if let Some(hint) = surface.processing_hint().await {
            debug!("remote status: {hint}");
        }

        sleep(wait.poll_interval).await;
    }
}

#[cfg(test)]
mod tests;
