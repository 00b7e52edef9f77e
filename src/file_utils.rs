// src/file_utils.rs

use crate::error::MediaError;
use std::{
    fs,
    io::{Error as IoError, ErrorKind as IoErrorKind},
    path::{Component, Path, PathBuf},
};
use walkdir::WalkDir;

/// Returns true if `file_name`, lowercased, ends with one of `suffixes`.
pub fn has_accepted_suffix<S: AsRef<str>>(file_name: &str, suffixes: &[S]) -> bool {
    let lowered = file_name.to_lowercase();
    suffixes
        .iter()
        .any(|suffix| lowered.ends_with(&suffix.as_ref().to_lowercase()))
}

/// Lists the direct entries of `folder_path` that are regular files with an
/// accepted suffix. Subdirectories are neither returned nor descended into.
/// Symlinks are followed for the file check, so a link to a directory is skipped.
/// A symlink whose target lies outside `folder_path` is skipped as well, since
/// `resolve_within` would refuse to deliver it.
///
/// # Errors
///
/// Returns `MediaError::DirectoryUnavailable` if `folder_path` is not a
/// directory or cannot be read. A readable directory with no matches is `Ok(vec![])`.
pub fn find_media_files<S: AsRef<str>>(
    folder_path: &Path,
    suffixes: &[S],
) -> Result<Vec<String>, MediaError> {
    let unavailable = |source: IoError| MediaError::DirectoryUnavailable {
        path: folder_path.to_path_buf(),
        source,
    };

    if !folder_path.is_dir() {
        return Err(unavailable(IoError::new(
            IoErrorKind::NotFound,
            format!("Path is not a directory: {}", folder_path.display()),
        )));
    }

    let base = fs::canonicalize(folder_path).map_err(unavailable)?;
    let mut media_files = Vec::new();

    // min_depth(1) skips the folder itself, max_depth(1) keeps the scan flat.
    for entry_result in WalkDir::new(folder_path).min_depth(1).max_depth(1) {
        let entry = entry_result.map_err(|e| unavailable(e.into()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if entry.path_is_symlink() {
            match fs::canonicalize(path) {
                Ok(target) if target.starts_with(&base) => {}
                _ => continue,
            }
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if has_accepted_suffix(name, suffixes) {
                media_files.push(name.to_string());
            }
        }
    }
    Ok(media_files)
}

/// Resolves a requested `name` relative to `base_dir` for file delivery.
///
/// The name is checked lexically before touching the filesystem: parent
/// segments, absolute paths and backslashes are rejected. The joined path
/// is then canonicalized and must still lie strictly inside the
/// canonicalized `base_dir`, which also catches symlinks pointing outside.
///
/// # Errors
///
/// * `MediaError::PathEscape` if the name would leave `base_dir`.
/// * `MediaError::NotFound` if nothing exists there or it is not a regular file.
/// * `MediaError::DirectoryUnavailable` if `base_dir` itself cannot be resolved.
pub fn resolve_within(base_dir: &Path, name: &str) -> Result<PathBuf, MediaError> {
    if name.is_empty() || name.contains('\\') || name.contains('\0') {
        return Err(MediaError::PathEscape(name.to_string()));
    }

    let relative = Path::new(name);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(MediaError::PathEscape(name.to_string()));
            }
        }
    }

    let base = fs::canonicalize(base_dir).map_err(|source| MediaError::DirectoryUnavailable {
        path: base_dir.to_path_buf(),
        source,
    })?;

    let resolved = match fs::canonicalize(base.join(relative)) {
        Ok(path) => path,
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            return Err(MediaError::NotFound(name.to_string()))
        }
        Err(e) => return Err(MediaError::Io(e)),
    };

    if resolved == base || !resolved.starts_with(&base) {
        return Err(MediaError::PathEscape(name.to_string()));
    }
    if !resolved.is_file() {
        return Err(MediaError::NotFound(name.to_string()));
    }
    Ok(resolved)
}
