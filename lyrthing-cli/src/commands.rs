use crate::cli::InputArgs;
use anyhow::{bail, Context, Result};
use lyrthing_core::providers::lrclib;
use lyrthing_core::{
    format_clock, line_statuses, parse_lrc, DirectoryProvider, LineStatus, LookupOutcome,
    LyricsFetcher, LyricsMetadata, LyricsProvider, LyricsStore, PlaybackState, TimedLine,
    TimedLyricsDocument, TrackInfo,
};
use std::fmt::Write;
use std::path::Path;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const LOG_TARGET: &str = "lyrthing::cli";

/// Read and parse the input file into a non-empty document
pub fn load_document(input: &InputArgs, default_source: &str) -> Result<TimedLyricsDocument> {
    let content = std::fs::read_to_string(&input.file)
        .with_context(|| format!("Failed to read {}", input.file.display()))?;

    let document = if input.lrclib_json {
        match lrclib::parse_response(&content)
            .with_context(|| format!("Invalid LRCLIB response in {}", input.file.display()))?
        {
            LookupOutcome::Found(mut raw) => {
                if input.source.is_some() {
                    raw.source.clone_from(&input.source);
                }
                raw.into_document(default_source)
            }
            LookupOutcome::NotFound => bail!("No lyrics found in {}", input.file.display()),
        }
    } else {
        let metadata = LyricsMetadata::new(&input.artist, &input.title, &input.album);
        let source = input.source.as_deref().unwrap_or(default_source);
        parse_lrc(&content, metadata, Some(source))
    };

    if document.is_empty() {
        bail!("No lyrics found in {}", input.file.display());
    }

    debug!(target: LOG_TARGET, "Loaded {} lines from {}", document.len(), input.file.display());
    Ok(document)
}

/// One row per line: marker, start time, progress and text
pub fn render_statuses(document: &TimedLyricsDocument, statuses: &[LineStatus]) -> String {
    let mut output = String::new();

    for (line, status) in document.lines().iter().zip(statuses) {
        let marker = if status.is_active { '>' } else { ' ' };
        let _ = writeln!(
            output,
            "{marker} [{:>8}] {:>6.2}%  {}",
            format_clock(Duration::from_millis(line.time), true),
            status.percentage,
            line.display_text()
        );
    }

    output
}

pub fn status(document: &TimedLyricsDocument, at_ms: f64, offset_ms: f64) -> String {
    let statuses = line_statuses(document, at_ms, offset_ms);
    render_statuses(document, &statuses)
}

/// Drive a simulated playback through a [`LyricsStore`], calling `on_line`
/// whenever a new line becomes active.
///
/// Stops at the document end time or when `cancel` fires.
pub async fn play<F>(
    document: TimedLyricsDocument,
    from_ms: u64,
    offset_ms: f64,
    tick: Duration,
    cancel: CancellationToken,
    mut on_line: F,
) where
    F: FnMut(&TimedLine),
{
    let end = Duration::from_millis(document.end_time());
    let (artist, title, album) = document.metadata().map_or_else(
        || (String::new(), String::new(), String::new()),
        |m| (m.artist.clone(), m.title.clone(), m.album.clone()),
    );

    let store = LyricsStore::new(offset_ms);
    let track = TrackInfo::new("local", title, artist, album, end);
    store
        .update_state(PlaybackState::new(true, Some(track), Duration::from_millis(from_ms)))
        .await;
    store.set_lyrics(document).await;

    let Some(lyrics) = store.lyrics().await else {
        return;
    };

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_shown = None;
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!(target: LOG_TARGET, "Playback cancelled");
                return;
            }
            _ = interval.tick() => {
                if let Some(Some(index)) = store.tick().await {
                    on_line(&lyrics.lines()[index]);
                    last_shown = Some(index);
                }
                if store.current_position().await >= end {
                    break;
                }
            }
        }
    }

    // The last line starts at the end time and is never classified active
    let last = lyrics.len() - 1;
    if last_shown != Some(last) {
        on_line(&lyrics.lines()[last]);
    }
}

/// Look up lyrics in `dir` through the fetcher
pub async fn fetch(
    dir: &Path,
    track: &TrackInfo,
    source_label: &str,
) -> Result<TimedLyricsDocument> {
    if !dir.is_dir() {
        bail!("Lyrics directory does not exist: {}", dir.display());
    }

    let providers: Vec<Box<dyn LyricsProvider>> = vec![Box::new(DirectoryProvider::new(dir))];
    let fetcher = LyricsFetcher::new(LyricsStore::new(0.0), providers, source_label, None);

    Ok(fetcher.fetch_document(track).await?)
}
