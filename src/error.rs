// src/error.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::{fmt, io, path::PathBuf};

/// Failures of the picker and the file-delivery routes.
///
/// An empty media directory is not an error: the picker returns `Ok(None)`.
#[derive(Debug)]
pub enum MediaError {
    /// A configured media directory is missing, not a directory, or unreadable.
    DirectoryUnavailable { path: PathBuf, source: io::Error },
    /// The requested file does not exist under its directory.
    NotFound(String),
    /// The requested name would resolve outside its directory.
    PathEscape(String),
    Io(io::Error),
    /// The blocking task running a directory listing was cancelled.
    Blocking,
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::DirectoryUnavailable { path, source } => write!(
                f,
                "media directory '{}' is unavailable: {}",
                path.display(),
                source
            ),
            MediaError::NotFound(name) => write!(f, "file not found: {}", name),
            MediaError::PathEscape(name) => {
                write!(f, "refusing to serve path outside media directory: {}", name)
            }
            MediaError::Io(e) => write!(f, "I/O error: {}", e),
            MediaError::Blocking => write!(f, "blocking task was cancelled"),
        }
    }
}

impl std::error::Error for MediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MediaError::DirectoryUnavailable { source, .. } => Some(source),
            MediaError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl ResponseError for MediaError {
    fn status_code(&self) -> StatusCode {
        match self {
            MediaError::NotFound(_) => StatusCode::NOT_FOUND,
            MediaError::PathEscape(_) => StatusCode::FORBIDDEN,
            MediaError::DirectoryUnavailable { .. } | MediaError::Io(_) | MediaError::Blocking => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    // Internal details (paths, OS errors) stay in the log, not in the body.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            MediaError::NotFound(_) => "Not Found",
            MediaError::PathEscape(_) => "Forbidden",
            _ => "Internal Server Error",
        };
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}
