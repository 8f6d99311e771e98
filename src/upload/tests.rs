use super::*;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn chunk_of_seven_by_three_gives_3_3_1() {
    let files = paths(&["a", "b", "c", "d", "e", "f", "g"]);
    let batches = chunk(&files, 3);
    let sizes: Vec<usize> = batches.iter().map(|b| b.files.len()).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
}

#[test]
fn chunk_concatenation_reproduces_input_in_order() {
    let files = paths(&["a", "b", "c", "d", "e"]);
    for size in 1..=6 {
        let rebuilt: Vec<PathBuf> = chunk(&files, size)
            .into_iter()
            .flat_map(|b| b.files)
            .collect();
        assert_eq!(rebuilt, files, "chunk size {size}");
    }
}

#[test]
fn chunk_never_exceeds_requested_size() {
    let files = paths(&["a", "b", "c", "d", "e", "f", "g"]);
    for size in 1..=8 {
        for batch in chunk(&files, size) {
            assert!(batch.files.len() <= size);
            assert!(!batch.files.is_empty());
        }
    }
}

#[test]
fn chunk_of_empty_input_is_empty() {
    assert!(chunk(&[], 3).is_empty());
}

/// Mock remote editor: records submissions, becomes ready after a fixed
/// number of readiness checks.
struct MockSurface {
    submitted: Mutex<Vec<Vec<PathBuf>>>,
    checks_until_ready: AtomicUsize,
    ever_ready: bool,
}

impl MockSurface {
    fn ready_after(checks: usize) -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            checks_until_ready: AtomicUsize::new(checks),
            ever_ready: true,
        }
    }

    fn never_ready() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            checks_until_ready: AtomicUsize::new(0),
            ever_ready: false,
        }
    }

    fn submissions(&self) -> Vec<Vec<PathBuf>> {
        self.submitted.lock().unwrap().clone()
    }
}

impl UploadSurface for MockSurface {
    async fn submit_files(&self, files: &[PathBuf]) -> crate::error::Result<()> {
        self.submitted.lock().unwrap().push(files.to_vec());
        Ok(())
    }

    async fn processing_complete(&self) -> crate::error::Result<bool> {
        if !self.ever_ready {
            return Ok(false);
        }
        let left = self.checks_until_ready.load(Ordering::SeqCst);
        if left == 0 {
            // Re-arm so the next batch has to wait again.
            self.checks_until_ready.store(1, Ordering::SeqCst);
            Ok(true)
        } else {
            self.checks_until_ready.store(left - 1, Ordering::SeqCst);
            Ok(false)
        }
    }

    async fn processing_hint(&self) -> Option<String> {
        None
    }
}

fn fast_wait() -> WaitSettings {
    WaitSettings {
        processing_timeout: Duration::from_millis(200),
        poll_interval: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn upload_all_submits_every_batch_in_order() {
    let surface = MockSurface::ready_after(1);
    let files = paths(&["a.mp3", "b.mp3", "c.mp3", "d.mp3", "e.mp3"]);

    upload_all(&surface, &files, 2, fast_wait()).await.unwrap();

    let submitted = surface.submissions();
    assert_eq!(submitted.len(), 3);
    assert_eq!(submitted[0], paths(&["a.mp3", "b.mp3"]));
    assert_eq!(submitted[1], paths(&["c.mp3", "d.mp3"]));
    assert_eq!(submitted[2], paths(&["e.mp3"]));
}

#[tokio::test]
async fn upload_all_stops_after_timed_out_batch() {
    let surface = MockSurface::never_ready();
    let files = paths(&["a.mp3", "b.mp3", "c.mp3", "d.mp3"]);

    let err = upload_all(&surface, &files, 2, fast_wait())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        crate::error::Error::StillProcessing { batch: 1, .. }
    ));
    // Only the first batch went out.
    assert_eq!(surface.submissions().len(), 1);
}

#[tokio::test]
async fn wait_until_ready_reports_timeout_as_false() {
    let surface = MockSurface::never_ready();
    let ready = wait_until_ready(&surface, fast_wait()).await.unwrap();
    assert!(!ready);
}

#[tokio::test]
async fn wait_until_ready_sees_late_readiness() {
    let surface = MockSurface::ready_after(3);
    let ready = wait_until_ready(&surface, fast_wait()).await.unwrap();
    assert!(ready);
}

#[test]
fn batches_cover_single_file() {
    let files = vec![Path::new("only.m4b").to_path_buf()];
    let batches = chunk(&files, 3);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].files, files);
}
