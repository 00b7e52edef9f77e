// src/config.rs

use crate::cli::ServerArgs;
use crate::media_kind::MediaKind;
use std::env;
use std::path::{Path, PathBuf};

/// Accepted video suffixes (all lowercase, compared case-insensitively).
pub const VIDEO_SUFFIXES: &[&str] = &[".mp4", ".webm", ".ogg", ".mov"];
/// Accepted audio suffixes (all lowercase, compared case-insensitively).
pub const AUDIO_SUFFIXES: &[&str] = &[".mp3", ".ogg"];

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_VIDEO_DIR: &str = "static/video";
pub const DEFAULT_AUDIO_DIR: &str = "static/audio";
pub const DEFAULT_LOGO_FILE: &str = "static/logo/example_logo.png";

// Environment fallbacks, read after `.env` has been loaded.
pub const ENV_HOST: &str = "BACKDROP_HOST";
pub const ENV_PORT: &str = "BACKDROP_PORT";
pub const ENV_VIDEO_DIR: &str = "BACKDROP_VIDEO_DIR";
pub const ENV_AUDIO_DIR: &str = "BACKDROP_AUDIO_DIR";
pub const ENV_LOGO: &str = "BACKDROP_LOGO";

/// Everything the router and the picker need, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub video_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub video_suffixes: Vec<String>,
    pub audio_suffixes: Vec<String>,
    /// Optional logo asset. Its absence never breaks the landing page.
    pub logo_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Builds a configuration with default suffix sets for the given directories.
    pub fn new(video_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            video_dir: video_dir.into(),
            audio_dir: audio_dir.into(),
            video_suffixes: to_owned_suffixes(VIDEO_SUFFIXES),
            audio_suffixes: to_owned_suffixes(AUDIO_SUFFIXES),
            logo_file: None,
        }
    }

    /// Resolves the configuration from CLI arguments, falling back to
    /// environment variables and then to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the port from the environment is not a number.
    pub fn from_args(args: &ServerArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let host = args
            .host
            .clone()
            .or_else(|| env::var(ENV_HOST).ok())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match args.port {
            Some(port) => port,
            None => match env::var(ENV_PORT) {
                Ok(value) => value
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| format!("Invalid {} value '{}': {}", ENV_PORT, value, e))?,
                Err(_) => DEFAULT_PORT,
            },
        };

        let video_dir = resolve_path(args.video_dir.as_deref(), ENV_VIDEO_DIR, DEFAULT_VIDEO_DIR);
        let audio_dir = resolve_path(args.audio_dir.as_deref(), ENV_AUDIO_DIR, DEFAULT_AUDIO_DIR);
        let logo_file = if args.no_logo {
            None
        } else {
            Some(resolve_path(args.logo.as_deref(), ENV_LOGO, DEFAULT_LOGO_FILE))
        };

        Ok(ServerConfig {
            host,
            port,
            logo_file,
            ..ServerConfig::new(video_dir, audio_dir)
        })
    }

    pub fn media_dir(&self, kind: MediaKind) -> &PathBuf {
        match kind {
            MediaKind::Video => &self.video_dir,
            MediaKind::Audio => &self.audio_dir,
        }
    }

    pub fn suffixes(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Video => &self.video_suffixes,
            MediaKind::Audio => &self.audio_suffixes,
        }
    }

    /// The configured logo file, if `name` is its file name. The logo route
    /// serves this one file and nothing else from its directory.
    pub fn logo_matching(&self, name: &str) -> Option<&Path> {
        self.logo_file
            .as_deref()
            .filter(|logo| logo.file_name().is_some_and(|file_name| file_name == name))
    }
}

fn to_owned_suffixes(suffixes: &[&str]) -> Vec<String> {
    suffixes.iter().map(|s| s.to_lowercase()).collect()
}

/// CLI value first, then the environment variable, then the default; `~` is expanded.
fn resolve_path(cli_value: Option<&str>, env_key: &str, default: &str) -> PathBuf {
    let raw = match cli_value {
        Some(value) => value.to_string(),
        None => env::var(env_key).unwrap_or_else(|_| default.to_string()),
    };
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}
