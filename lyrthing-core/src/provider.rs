use crate::document::{LyricsMetadata, TimedLyricsDocument};
use crate::error::CoreError;
use crate::lrc::parse_lrc;
use async_trait::async_trait;

/// Query parameters for looking up lyrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    pub track_name: String,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
}

impl LyricsQuery {
    pub fn new(track_name: impl Into<String>) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: None,
            album_name: None,
        }
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist_name = Some(artist.into());
        self
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album_name = Some(album.into());
        self
    }

    /// Error reported when every provider comes back empty
    #[must_use]
    pub fn not_found(&self) -> CoreError {
        CoreError::LyricsNotFound {
            track: self.track_name.clone(),
            artist: self.artist_name.clone().unwrap_or_default(),
        }
    }
}

/// Raw line-synced lyrics as returned by a lookup, before parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLyrics {
    /// LRC text
    pub synced_lyrics: String,
    pub metadata: LyricsMetadata,
    /// Provider label recorded on the document; `None` uses the default
    pub source: Option<String>,
}

impl RawLyrics {
    /// Parse into a document, falling back to `default_source` for the label
    #[must_use]
    pub fn into_document(self, default_source: &str) -> TimedLyricsDocument {
        let source = self.source.as_deref().unwrap_or(default_source);
        parse_lrc(&self.synced_lyrics, self.metadata, Some(source))
    }
}

/// Result of a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(RawLyrics),
    NotFound,
}

impl LookupOutcome {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A lyrics lookup collaborator
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Look up lyrics for a query
    async fn fetch(&self, query: &LyricsQuery) -> Result<LookupOutcome, CoreError>;
}
