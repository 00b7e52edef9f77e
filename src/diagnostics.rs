// src/diagnostics.rs

use crate::config::ServerConfig;
use crate::file_utils::find_media_files;
use crate::media_kind::MediaKind;
use chrono::{DateTime, Local};
use log::error;
use serde::Serialize;
use std::{fs, path::Path};

/// What the `check` subcommand knows about a single path.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: String,
    pub exists: bool,
    pub is_dir: bool,
    pub size_bytes: Option<u64>,
    /// Permission bits in octal, e.g. "644". Unix only.
    pub permissions: Option<String>,
    pub mime_type: Option<String>,
    pub modified: Option<String>,
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> Option<String> {
    use std::os::unix::fs::PermissionsExt;
    Some(format!("{:o}", metadata.permissions().mode() & 0o777))
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &fs::Metadata) -> Option<String> {
    None
}

/// Collects existence, size, permissions, guessed type and mtime of `path`.
/// A missing path is reported, not treated as an error.
pub fn inspect_path(path: &Path) -> FileReport {
    let mut report = FileReport {
        path: path.display().to_string(),
        exists: false,
        is_dir: false,
        size_bytes: None,
        permissions: None,
        mime_type: None,
        modified: None,
    };

    let Ok(metadata) = fs::metadata(path) else {
        return report;
    };

    report.exists = true;
    report.is_dir = metadata.is_dir();
    report.permissions = permission_bits(&metadata);
    report.modified = metadata.modified().ok().map(|time| {
        DateTime::<Local>::from(time)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    });
    if !report.is_dir {
        report.size_bytes = Some(metadata.len());
        report.mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
    }
    report
}

/// Result of checking every configured media location.
#[derive(Serialize, Debug, Clone, Default)]
pub struct LibraryReport {
    pub entries: Vec<FileReport>,
    /// True when every media directory could be listed.
    pub healthy: bool,
}

/// Inspects both media directories, every eligible file inside them and the logo.
pub fn check_library(config: &ServerConfig) -> LibraryReport {
    let mut report = LibraryReport {
        entries: Vec::new(),
        healthy: true,
    };

    for kind in [MediaKind::Video, MediaKind::Audio] {
        let dir = config.media_dir(kind);
        let dir_report = inspect_path(dir);
        let listable = dir_report.exists && dir_report.is_dir;
        report.entries.push(dir_report);

        if !listable {
            report.healthy = false;
            continue;
        }
        match find_media_files(dir, config.suffixes(kind)) {
            Ok(mut files) => {
                files.sort();
                report
                    .entries
                    .extend(files.iter().map(|name| inspect_path(&dir.join(name))));
            }
            Err(e) => {
                error!("{}", e);
                report.healthy = false;
            }
        }
    }

    if let Some(logo) = &config.logo_file {
        report.entries.push(inspect_path(logo));
    }
    report
}

/// One human-readable line per entry.
pub fn format_report(report: &LibraryReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        if !entry.exists {
            out.push_str(&format!("MISSING  {}\n", entry.path));
            continue;
        }
        let kind = if entry.is_dir { "DIR" } else { "FILE" };
        out.push_str(&format!(
            "{:<8} {} | size: {} | permissions: {} | type: {} | modified: {}\n",
            kind,
            entry.path,
            entry
                .size_bytes
                .map_or_else(|| "-".to_string(), |s| format!("{} bytes", s)),
            entry.permissions.as_deref().unwrap_or("-"),
            entry.mime_type.as_deref().unwrap_or("-"),
            entry.modified.as_deref().unwrap_or("-"),
        ));
    }
    out
}
