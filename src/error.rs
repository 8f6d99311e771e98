//! Error types for yotoup.
//!
//! One enum for everything the workflows can hit, so failures surface to the
//! operator with a clear indication of which step gave up.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The folder given for upload does not exist (or is not a folder).
    #[error("folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// The folder exists but holds no files with an accepted extension.
    #[error("no audio files with accepted extensions in {}", .0.display())]
    EmptyFolder(PathBuf),

    /// The remote side never signalled readiness within the configured bound.
    /// Recoverable: the upload may still finish server-side; the operator can
    /// wait and re-check, or re-run with a longer timeout.
    #[error("batch {batch} still processing after {waited_secs}s; the site may catch up on its own")]
    StillProcessing { batch: usize, waited_secs: u64 },

    /// The browser left the playlist editor mid-run (navigation, logout).
    #[error("navigated away from the playlist editor; stopping")]
    LeftEditor,

    /// The editor's icon picker did not behave as expected (track row gone,
    /// chosen icon missing from the dialog).
    #[error("icon picker: {0}")]
    Picker(String),

    /// WebDriver-level failure: missing element, dead session. Usually means
    /// the site markup changed out from under our selectors.
    #[error("remote UI interaction failed ({0}); the site markup may have changed")]
    Remote(#[from] thirtyfour::error::WebDriverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the yotoup Error.
pub type Result<T> = std::result::Result<T, Error>;
