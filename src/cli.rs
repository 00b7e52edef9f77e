// src/cli.rs

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Serves a landing page with a random background video and audio track.",
    long_about = None
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(flatten)]
    pub server: ServerArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web server (the default when no subcommand is given).
    Serve,
    /// Report existence, size, permissions and type of the configured media files.
    Check {
        /// Print the report as JSON.
        #[clap(long, action = clap::ArgAction::SetTrue)]
        json: bool,
    },
}

/// Options shared by every subcommand. Unset values fall back to the environment.
#[derive(Args, Debug)]
pub struct ServerArgs {
    #[clap(long, global = true)]
    pub host: Option<String>,

    #[clap(short, long, global = true)]
    pub port: Option<u16>,

    /// Directory holding the background videos.
    #[clap(long, global = true)]
    pub video_dir: Option<String>,

    /// Directory holding the background audio tracks.
    #[clap(long, global = true)]
    pub audio_dir: Option<String>,

    /// Path of the optional logo image.
    #[clap(long, global = true)]
    pub logo: Option<String>,

    #[clap(long, name = "no-logo", global = true, action = clap::ArgAction::SetTrue)]
    pub no_logo: bool,
}
