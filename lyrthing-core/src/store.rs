use crate::document::TimedLyricsDocument;
use crate::playback::{PlaybackState, TrackInfo};
use crate::tracker::ActiveLineTracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

const LOG_TARGET: &str = "lyrthing::store";

/// Position jump treated as a seek rather than drift
const SEEK_THRESHOLD: Duration = Duration::from_secs(2);

/// Events emitted by the lyrics store
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A different track is now loaded; any previous lyrics were discarded
    TrackChanged {
        track: TrackInfo,
        position: Duration,
    },
    PlaybackPaused {
        position: Duration,
    },
    PlaybackResumed {
        position: Duration,
    },
    /// No track loaded
    PlaybackStopped,
    SeekOccurred {
        position: Duration,
    },
    LyricsLoaded {
        lyrics: Arc<TimedLyricsDocument>,
    },
    LyricsNotFound,
    /// The highlighted line changed; `None` during gaps
    ActiveLineChanged {
        index: Option<usize>,
    },
    Error {
        message: String,
    },
}

struct StoreInner {
    state: PlaybackState,
    lyrics: Option<Arc<TimedLyricsDocument>>,
    tracker: ActiveLineTracker,
}

impl StoreInner {
    /// `None` matches any state
    fn is_current(&self, track_id: Option<&str>) -> bool {
        match track_id {
            Some(id) => self.state.track.as_ref().is_some_and(|t| t.id == id),
            None => true,
        }
    }
}

/// Holds the current playback state and lyrics document.
///
/// A document is only ever replaced whole. It is dropped when the track
/// changes or a lookup fails.
pub struct LyricsStore {
    inner: RwLock<StoreInner>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl LyricsStore {
    /// Create a store that classifies lines at `position + offset_ms`
    #[must_use]
    pub fn new(offset_ms: f64) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);

        Arc::new(Self {
            inner: RwLock::new(StoreInner {
                state: PlaybackState::default(),
                lyrics: None,
                tracker: ActiveLineTracker::new(offset_ms),
            }),
            event_tx,
        })
    }

    /// Subscribe to store events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // no receivers is fine
        let _ = self.event_tx.send(event);
    }

    /// Update playback state and emit appropriate events
    pub async fn update_state(&self, new_state: PlaybackState) {
        let mut inner = self.inner.write().await;
        let old_state = &inner.state;

        let track_changed = old_state.track_changed(&new_state);
        let playback_changed = old_state.playback_state_changed(&new_state);
        let seek_occurred = old_state.seek_occurred(&new_state, SEEK_THRESHOLD);

        if track_changed {
            inner.lyrics = None;
            inner.tracker.reset();

            if let Some(ref track) = new_state.track {
                info!(target: LOG_TARGET, "Track changed: {} - {}", track.artist, track.name);
                self.emit(StoreEvent::TrackChanged {
                    track: track.clone(),
                    position: new_state.position,
                });
            } else {
                info!(target: LOG_TARGET, "Playback stopped");
                self.emit(StoreEvent::PlaybackStopped);
            }
        } else if playback_changed {
            if new_state.is_playing {
                self.emit(StoreEvent::PlaybackResumed {
                    position: new_state.position,
                });
            } else {
                self.emit(StoreEvent::PlaybackPaused {
                    position: new_state.position,
                });
            }
        } else if seek_occurred {
            debug!(target: LOG_TARGET, "Seek to {:?}", new_state.position);
            self.emit(StoreEvent::SeekOccurred {
                position: new_state.position,
            });
        }

        inner.state = new_state;
    }

    /// Replace the current lyrics.
    ///
    /// An empty document carries no lyrics and is reported as not found.
    pub async fn set_lyrics(&self, lyrics: TimedLyricsDocument) {
        self.install(None, lyrics).await;
    }

    /// Replace the current lyrics if `track_id` is still the loaded track.
    ///
    /// The track check and the swap happen under one write lock. Returns
    /// `false` when the document was dropped.
    pub async fn set_lyrics_for(&self, track_id: &str, lyrics: TimedLyricsDocument) -> bool {
        self.install(Some(track_id), lyrics).await
    }

    /// Mark that no lyrics were found
    pub async fn set_no_lyrics(&self) {
        self.clear(None).await;
    }

    /// Mark that no lyrics were found for `track_id`, if it is still loaded
    pub async fn set_no_lyrics_for(&self, track_id: &str) -> bool {
        self.clear(Some(track_id)).await
    }

    async fn install(&self, track_id: Option<&str>, lyrics: TimedLyricsDocument) -> bool {
        if lyrics.is_empty() {
            return self.clear(track_id).await;
        }

        let lyrics = Arc::new(lyrics);
        {
            let mut inner = self.inner.write().await;
            if !inner.is_current(track_id) {
                debug!(target: LOG_TARGET, "Dropping lyrics for stale track {:?}", track_id);
                return false;
            }
            inner.lyrics = Some(Arc::clone(&lyrics));
            inner.tracker.reset();
        }
        info!(target: LOG_TARGET, "Lyrics loaded: {} lines from {}", lyrics.len(), lyrics.source());
        self.emit(StoreEvent::LyricsLoaded { lyrics });
        true
    }

    async fn clear(&self, track_id: Option<&str>) -> bool {
        {
            let mut inner = self.inner.write().await;
            if !inner.is_current(track_id) {
                return false;
            }
            inner.lyrics = None;
            inner.tracker.reset();
        }
        self.emit(StoreEvent::LyricsNotFound);
        true
    }

    /// Emit an error event
    pub fn emit_error(&self, message: String) {
        self.emit(StoreEvent::Error { message });
    }

    /// Recompute the active line at the interpolated position.
    ///
    /// Emits [`StoreEvent::ActiveLineChanged`] and returns the new index when
    /// the active line changed.
    pub async fn tick(&self) -> Option<Option<usize>> {
        let mut inner = self.inner.write().await;
        let position_ms = inner.state.position_ms();
        let lyrics = inner.lyrics.clone()?;

        let changed = inner.tracker.update(&lyrics, position_ms);
        drop(inner);

        if let Some(index) = changed {
            debug!(target: LOG_TARGET, "Active line {:?} at {}ms", index, position_ms);
            self.emit(StoreEvent::ActiveLineChanged { index });
        }
        changed
    }

    /// Get current playback state
    pub async fn state(&self) -> PlaybackState {
        self.inner.read().await.state.clone()
    }

    /// Get current lyrics
    pub async fn lyrics(&self) -> Option<Arc<TimedLyricsDocument>> {
        self.inner.read().await.lyrics.clone()
    }

    /// Get interpolated current position
    pub async fn current_position(&self) -> Duration {
        self.inner.read().await.state.interpolated_position()
    }

    /// Last active line reported by [`tick`](Self::tick)
    pub async fn active_line(&self) -> Option<usize> {
        self.inner.read().await.tracker.current()
    }

    /// Get current track info
    pub async fn current_track(&self) -> Option<TrackInfo> {
        self.inner.read().await.state.track.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TimedLine;

    fn track(id: &str) -> TrackInfo {
        TrackInfo::new(id, "Song", "Artist", "Album", Duration::from_secs(180))
    }

    fn doc() -> TimedLyricsDocument {
        TimedLyricsDocument::new(
            vec![
                TimedLine::new(1000, "one"),
                TimedLine::new(2000, "two"),
                TimedLine::new(3000, "three"),
            ],
            "test",
            None,
        )
    }

    fn paused_at(id: &str, position_ms: u64) -> PlaybackState {
        PlaybackState::new(false, Some(track(id)), Duration::from_millis(position_ms))
    }

    #[tokio::test]
    async fn test_track_change_emits_and_clears_lyrics() {
        let store = LyricsStore::new(0.0);
        let mut rx = store.subscribe();

        store.update_state(paused_at("a", 0)).await;
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::TrackChanged { ref track, .. } if track.id == "a"));

        store.set_lyrics(doc()).await;
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::LyricsLoaded { .. }));
        assert!(store.lyrics().await.is_some());

        store.update_state(paused_at("b", 0)).await;
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::TrackChanged { .. }));
        assert!(store.lyrics().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_emits_stopped() {
        let store = LyricsStore::new(0.0);
        store.update_state(paused_at("a", 0)).await;

        let mut rx = store.subscribe();
        store.update_state(PlaybackState::default()).await;
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::PlaybackStopped));
        assert!(store.current_track().await.is_none());
    }

    #[tokio::test]
    async fn test_pause_resume_and_seek() {
        let store = LyricsStore::new(0.0);
        store.update_state(paused_at("a", 1000)).await;

        let mut rx = store.subscribe();
        store
            .update_state(PlaybackState::new(true, Some(track("a")), Duration::from_millis(1000)))
            .await;
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::PlaybackResumed { .. }));

        store
            .update_state(PlaybackState::new(true, Some(track("a")), Duration::from_secs(90)))
            .await;
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::SeekOccurred { position } if position == Duration::from_secs(90)));
    }

    #[tokio::test]
    async fn test_empty_document_is_not_found() {
        let store = LyricsStore::new(0.0);
        let mut rx = store.subscribe();

        store.set_lyrics(TimedLyricsDocument::new(vec![], "test", None)).await;
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::LyricsNotFound));
        assert!(store.lyrics().await.is_none());
    }

    #[tokio::test]
    async fn test_set_lyrics_replaces_whole_document() {
        let store = LyricsStore::new(0.0);
        store.set_lyrics(doc()).await;

        let replacement = TimedLyricsDocument::new(vec![TimedLine::new(0, "only")], "other", None);
        store.set_lyrics(replacement.clone()).await;

        assert_eq!(*store.lyrics().await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn test_set_lyrics_for_stale_track_is_dropped() {
        let store = LyricsStore::new(0.0);
        store.update_state(paused_at("a", 1500)).await;
        store.update_state(paused_at("b", 1500)).await;

        let mut rx = store.subscribe();
        assert!(!store.set_lyrics_for("a", doc()).await);
        assert!(!store.set_no_lyrics_for("a").await);
        assert!(store.lyrics().await.is_none());
        assert!(rx.try_recv().is_err());
        assert_eq!(store.tick().await, None);

        assert!(store.set_lyrics_for("b", doc()).await);
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::LyricsLoaded { .. }));
        assert_eq!(store.tick().await, Some(Some(0)));
    }

    #[tokio::test]
    async fn test_set_lyrics_for_without_track_is_dropped() {
        let store = LyricsStore::new(0.0);
        assert!(!store.set_lyrics_for("a", doc()).await);
        assert!(store.lyrics().await.is_none());
    }

    #[tokio::test]
    async fn test_tick_reports_active_line_changes() {
        let store = LyricsStore::new(0.0);
        store.update_state(paused_at("a", 1500)).await;

        // no lyrics yet
        assert_eq!(store.tick().await, None);

        store.set_lyrics(doc()).await;
        let mut rx = store.subscribe();

        assert_eq!(store.tick().await, Some(Some(0)));
        assert!(matches!(rx.recv().await.unwrap(), StoreEvent::ActiveLineChanged { index: Some(0) }));
        assert_eq!(store.tick().await, None);

        store.update_state(paused_at("a", 2500)).await;
        assert_eq!(store.tick().await, Some(Some(1)));
        assert_eq!(store.active_line().await, Some(1));

        store.update_state(paused_at("a", 500)).await;
        assert_eq!(store.tick().await, Some(None));
    }

    #[tokio::test]
    async fn test_tick_applies_offset() {
        let store = LyricsStore::new(100.0);
        store.update_state(paused_at("a", 950)).await;
        store.set_lyrics(doc()).await;

        assert_eq!(store.tick().await, Some(Some(0)));
    }
}
