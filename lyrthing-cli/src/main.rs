mod cli;
mod commands;
mod logging;

use crate::cli::{Cli, Command};
use anyhow::{Context, Result};
use clap::Parser;
use lyrthing_core::{CoreError, LyrthingConfig, TrackInfo};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const LOG_TARGET: &str = "lyrthing::cli";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config decides whether file logging is on, so it loads before tracing
    let (config, created_template) = load_config(cli.config.as_deref())?;
    logging::init_tracing(config.logging.enabled);

    if let Some(path) = created_template {
        info!(target: LOG_TARGET, "Created config template at {}, using defaults", path.display());
    }

    let offset_default = config.lyrics.offset_ms_f64();
    let source_label = config.lyrics.source_label.as_str();

    match cli.command {
        Command::Parse { input } => {
            let document = commands::load_document(&input, source_label)?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Status { input, at, offset } => {
            let document = commands::load_document(&input, source_label)?;
            print!("{}", commands::status(&document, at, offset.unwrap_or(offset_default)));
        }
        Command::Play {
            input,
            from,
            offset,
        } => {
            let document = commands::load_document(&input, source_label)?;

            let cancel_token = CancellationToken::new();
            let ctrlc_token = cancel_token.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                info!(target: LOG_TARGET, "Received Ctrl+C, stopping playback");
                ctrlc_token.cancel();
            }) {
                error!(target: LOG_TARGET, "Failed to set Ctrl+C handler: {}", e);
            }

            commands::play(
                document,
                from,
                offset.unwrap_or(offset_default),
                config.playback.tick_interval(),
                cancel_token,
                |line| {
                    println!(
                        "[{}] {}",
                        lyrthing_core::format_clock(Duration::from_millis(line.time), false),
                        line.display_text()
                    );
                },
            )
            .await;
        }
        Command::Fetch {
            dir,
            artist,
            title,
            album,
        } => {
            let dir = dir
                .or_else(|| config.lyrics.lyrics_dir.clone())
                .context("No lyrics directory: pass --dir or set lyrics.lyrics_dir")?;
            let track = TrackInfo::new(
                "cli",
                title,
                artist,
                album.unwrap_or_default(),
                Duration::ZERO,
            );

            let document = commands::fetch(&dir, &track, source_label).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}

/// Load config, falling back to defaults when a template was just created.
///
/// Returns the template path in that case so it can be logged once tracing is up.
fn load_config(path: Option<&Path>) -> Result<(LyrthingConfig, Option<PathBuf>)> {
    let path = path.map_or_else(LyrthingConfig::config_path, Path::to_path_buf);

    match LyrthingConfig::load_or_create_at(&path) {
        Ok(config) => Ok((config, None)),
        Err(CoreError::ConfigNotFound { path }) => Ok((LyrthingConfig::default(), Some(path))),
        Err(e) => Err(e).with_context(|| format!("Failed to load config from {}", path.display())),
    }
}
