// src/main.rs

use clap::Parser;
use local_ip_address::local_ip;
use log::{error, info, warn};
use std::process;

// Module declarations
mod cli;
mod config;
mod diagnostics;
mod error;
mod file_utils;
mod media_kind;
mod page;
mod picker;
mod stream_server;

// Crate imports for convenience
use crate::cli::{Cli, Command};
use crate::config::ServerConfig;
use crate::diagnostics::{check_library, format_report};
use crate::media_kind::MediaKind;
use crate::stream_server::run_server;

#[tokio::main]
async fn main() {
    if let Err(err) = run_app().await {
        eprintln!("\nApplication Error: {}", err);
        process::exit(1);
    }
}

async fn run_app() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli_args = Cli::parse();
    let config = ServerConfig::from_args(&cli_args.server)?;

    match cli_args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Check { json } => check(&config, json),
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Missing directories are reported per request as server errors; warn early too.
    for kind in [MediaKind::Video, MediaKind::Audio] {
        let dir = config.media_dir(kind);
        if !dir.is_dir() {
            error!(
                "{:?} directory '{}' does not exist; the landing page will fail until it does.",
                kind,
                dir.display()
            );
        }
    }
    match &config.logo_file {
        Some(logo) if !logo.is_file() => {
            warn!("Logo '{}' not found; serving without it.", logo.display())
        }
        _ => {}
    }

    // A wildcard bind is reachable from the LAN, so show that address.
    let display_host = if config.host == "0.0.0.0" {
        match local_ip() {
            Ok(ip) => ip.to_string(),
            Err(e) => {
                warn!("Could not determine local IP address: {}", e);
                config.host.clone()
            }
        }
    } else {
        config.host.clone()
    };
    info!("Serving at http://{}:{}/", display_host, config.port);

    run_server(config)?.await?;
    Ok(())
}

fn check(config: &ServerConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = check_library(config);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    if !report.healthy {
        return Err("one or more media directories are missing or unreadable".into());
    }
    Ok(())
}
