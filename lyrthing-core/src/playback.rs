use crate::provider::LyricsQuery;
use crate::time::DurationExt;
use std::time::{Duration, Instant};

/// Current playback state reported by the host
#[derive(Debug, Clone)]
pub struct PlaybackState {
    /// Whether music is currently playing
    pub is_playing: bool,
    /// Current track information (None if nothing is playing)
    pub track: Option<TrackInfo>,
    /// Current playback position
    pub position: Duration,
    /// When this state was last updated (for interpolation)
    pub updated_at: Instant,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            track: None,
            position: Duration::ZERO,
            updated_at: Instant::now(),
        }
    }
}

impl PlaybackState {
    #[must_use]
    pub fn new(is_playing: bool, track: Option<TrackInfo>, position: Duration) -> Self {
        Self {
            is_playing,
            track,
            position,
            updated_at: Instant::now(),
        }
    }

    /// Get interpolated position based on time elapsed since last update.
    ///
    /// Clamped to the track duration when one is known.
    #[must_use]
    pub fn interpolated_position(&self) -> Duration {
        self.interpolated_position_at(Instant::now())
    }

    /// [`interpolated_position`](Self::interpolated_position) as seen at `now`
    #[must_use]
    pub fn interpolated_position_at(&self, now: Instant) -> Duration {
        if !self.is_playing {
            return self.position;
        }

        let interpolated = self.position + now.saturating_duration_since(self.updated_at);

        match &self.track {
            Some(track) if !track.duration.is_zero() => interpolated.min(track.duration),
            _ => interpolated,
        }
    }

    /// Interpolated position in milliseconds, as the classifier expects
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position_ms(&self) -> f64 {
        self.interpolated_position().as_millis_u64() as f64
    }

    /// Check if the track has changed
    #[must_use]
    pub fn track_changed(&self, other: &Self) -> bool {
        match (&self.track, &other.track) {
            (Some(a), Some(b)) => a.id != b.id,
            (None, None) => false,
            _ => true,
        }
    }

    /// Check if playback state changed (playing <-> paused)
    #[must_use]
    pub const fn playback_state_changed(&self, other: &Self) -> bool {
        self.is_playing != other.is_playing
    }

    /// Check if a seek occurred (position jumped unexpectedly)
    #[must_use]
    pub fn seek_occurred(&self, other: &Self, threshold: Duration) -> bool {
        if self.track_changed(other) {
            return false;
        }

        let expected = self.interpolated_position();
        let actual = other.position;

        if actual > expected {
            actual - expected > threshold
        } else {
            expected - actual > threshold
        }
    }
}

/// Information about the currently playing track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// Host-assigned track identifier
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    /// Zero when unknown
    pub duration: Duration,
}

impl TrackInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            album: album.into(),
            duration,
        }
    }

    /// Build a lookup query; empty artist/album fields are left out
    #[must_use]
    pub fn to_query(&self) -> LyricsQuery {
        let mut query = LyricsQuery::new(&self.name);
        if !self.artist.is_empty() {
            query = query.with_artist(&self.artist);
        }
        if !self.album.is_empty() {
            query = query.with_album(&self.album);
        }
        query
    }
}
