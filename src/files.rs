//! Audio file collection.
//!
//! Scans a folder (non-recursively) for files the Yoto editor will accept
//! and returns them in a deterministic listing order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Clean up configured extensions once: trimmed, lowercased, without dot.
fn normalized(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Expects an already-normalized extension list.
fn is_accepted(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Collect the uploadable audio files directly inside `dir`, sorted by
/// file name.
///
/// An empty result is not an error; the caller decides whether that is
/// fatal. A missing folder is.
pub fn collect(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FolderNotFound(dir.to_path_buf()));
    }

    let exts = normalized(extensions);

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        let path = entry.path();
        if path.is_file() && is_accepted(path, &exts) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
