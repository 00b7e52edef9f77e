// src/picker.rs

use crate::error::MediaError;
use crate::file_utils::find_media_files;
use log::debug;
use rand::prelude::*;
use std::path::Path;

/// Picks one eligible file from `directory` uniformly at random.
///
/// The directory is listed on every call; nothing is cached, so files added
/// or removed between calls are picked up immediately. The returned name is
/// relative to `directory`.
///
/// Returns `Ok(None)` when the directory holds no eligible files.
///
/// # Errors
///
/// Returns `MediaError::DirectoryUnavailable` if the directory is missing or
/// unreadable. That case is never reported as `Ok(None)`.
pub fn pick<S: AsRef<str>>(directory: &Path, suffixes: &[S]) -> Result<Option<String>, MediaError> {
    let candidates = find_media_files(directory, suffixes)?;
    let selection = candidates.choose(&mut rand::rng()).cloned();

    debug!(
        "{} eligible file(s) in '{}', picked {:?}",
        candidates.len(),
        directory.display(),
        selection
    );
    Ok(selection)
}
