//! Lyrics fetcher that orchestrates lookup providers.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::document::TimedLyricsDocument;
use crate::error::Result;
use crate::playback::TrackInfo;
use crate::provider::{LookupOutcome, LyricsProvider};
use crate::store::{LyricsStore, StoreEvent};

const LOG_TARGET: &str = "lyrthing::fetcher";

/// Listens for track changes and loads lyrics into the store
pub struct LyricsFetcher {
    store: Arc<LyricsStore>,
    providers: Vec<Box<dyn LyricsProvider>>,
    source_label: String,
    cancel_token: CancellationToken,
}

impl LyricsFetcher {
    /// Create a new lyrics fetcher
    ///
    /// # Arguments
    /// * `store` - Store to listen on and load lyrics into
    /// * `providers` - Lookup providers to try in order
    /// * `source_label` - Document source for providers that don't name one
    /// * `cancel_token` - Optional external cancellation token for graceful shutdown
    pub fn new(
        store: Arc<LyricsStore>,
        providers: Vec<Box<dyn LyricsProvider>>,
        source_label: impl Into<String>,
        cancel_token: Option<CancellationToken>,
    ) -> Self {
        Self {
            store,
            providers,
            source_label: source_label.into(),
            cancel_token: cancel_token.unwrap_or_default(),
        }
    }

    /// Get a clone of the cancellation token
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Start the lyrics fetcher in a background task
    #[must_use]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the lyrics fetching loop
    async fn run(&self) {
        info!(target: LOG_TARGET, "Initializing lyrics fetching handler");

        let mut rx = self.store.subscribe();

        // A track may already be loaded before the loop subscribed
        if let Some(track) = self.store.current_track().await {
            if self.store.lyrics().await.is_none() {
                self.load_for_track(&track).await;
            }
        }

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!(target: LOG_TARGET, "Lyrics fetcher shutting down");
                    break;
                }
                event = rx.recv() => {
                    match event {
                        Ok(StoreEvent::TrackChanged { track, .. }) => {
                            self.load_for_track(&track).await;
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            break;
                        }
                        _ => {
                            // Lagged or unrelated events
                        }
                    }
                }
            }
        }
    }

    async fn load_for_track(&self, track: &TrackInfo) {
        let applied = match self.fetch_document(track).await {
            Ok(document) => self.store.set_lyrics_for(&track.id, document).await,
            Err(e) => {
                info!(target: LOG_TARGET, "{e}");
                self.store.set_no_lyrics_for(&track.id).await
            }
        };

        if !applied {
            info!(target: LOG_TARGET, "Discarding lookup for {}: track changed", track.name);
        }
    }

    /// Look up and parse lyrics for a track.
    ///
    /// Providers are tried in order; the first that yields a non-empty
    /// document wins. Provider errors are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::LyricsNotFound`](crate::CoreError::LyricsNotFound)
    /// when no provider produced any timed lines.
    pub async fn fetch_document(&self, track: &TrackInfo) -> Result<TimedLyricsDocument> {
        let provider_names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        info!(
            target: LOG_TARGET,
            "Fetching lyrics for: {} - {} (providers: {:?})",
            track.artist, track.name, provider_names
        );

        let query = track.to_query();

        for provider in &self.providers {
            match provider.fetch(&query).await {
                Ok(LookupOutcome::Found(raw)) => {
                    let document = raw.into_document(&self.source_label);
                    if document.is_empty() {
                        info!(
                            target: LOG_TARGET,
                            "Provider {} returned lyrics without timestamps",
                            provider.name()
                        );
                        continue;
                    }
                    info!(
                        target: LOG_TARGET,
                        "Found synced lyrics from {} ({} lines)",
                        provider.name(),
                        document.len()
                    );
                    return Ok(document);
                }
                Ok(LookupOutcome::NotFound) => {
                    info!(target: LOG_TARGET, "Provider {} returned no lyrics", provider.name());
                }
                Err(e) => {
                    warn!(target: LOG_TARGET, "Provider {} failed with error: {}", provider.name(), e);
                }
            }
        }

        Err(query.not_found())
    }
}
