//! Timed lyrics document produced by the LRC parser.
//!
//! The serialized form matches the JSON lyric format used by the dashboard
//! client, so documents can be handed to a renderer or persisted as-is:
//!
//! ```json
//! {
//!   "lines": { "lines": [{ "time": 12340, "text": "Hello" }], "linesEnd": 12340 },
//!   "source": "LRCLib",
//!   "metadata": { "Artist": "…", "Title": "…", "Album": "…" }
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown for lines with no text (instrumental breaks)
pub const INSTRUMENTAL_PLACEHOLDER: &str = "· · ·";

/// Descriptive track fields attached verbatim to a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsMetadata {
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Album")]
    pub album: String,
    #[serde(rename = "MxmId", default, skip_serializing_if = "Option::is_none")]
    pub mxm_id: Option<String>,
    #[serde(rename = "ITunesId", default, skip_serializing_if = "Option::is_none")]
    pub itunes_id: Option<String>,
    #[serde(rename = "SpotifyId", default, skip_serializing_if = "Option::is_none")]
    pub spotify_id: Option<String>,
    #[serde(rename = "Copyright", default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl LyricsMetadata {
    /// Create metadata with the required descriptive fields
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            album: album.into(),
            ..Self::default()
        }
    }

    /// Set the Spotify track ID
    #[must_use]
    pub fn with_spotify_id(mut self, id: impl Into<String>) -> Self {
        self.spotify_id = Some(id.into());
        self
    }
}

/// A single line of lyrics with its start time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedLine {
    /// Milliseconds from the start of the track
    #[serde(deserialize_with = "deserialize_millis")]
    pub time: u64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl TimedLine {
    pub fn new(time: u64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
            translation: None,
        }
    }

    /// Whether this line marks an instrumental break
    #[must_use]
    pub fn is_instrumental(&self) -> bool {
        self.text.is_empty()
    }

    /// Text to render, substituting a placeholder for instrumental lines
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.is_instrumental() {
            INSTRUMENTAL_PLACEHOLDER
        } else {
            &self.text
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TimedLines {
    lines: Vec<TimedLine>,
    #[serde(rename = "linesEnd", deserialize_with = "deserialize_millis")]
    end_time: u64,
}

/// Structured, immutable lyrics document.
///
/// Lines keep their input order. A line's effective end is not stored; it is
/// the next line's start, or [`end_time`](Self::end_time) for the last line
/// (see [`line_end`](Self::line_end)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedLyricsDocument {
    lines: TimedLines,
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<LyricsMetadata>,
}

impl TimedLyricsDocument {
    /// Build a document from lines in chronological order.
    ///
    /// `end_time` is taken as the maximum line time, so an out-of-order final
    /// line does not shorten the document.
    pub fn new(
        lines: Vec<TimedLine>,
        source: impl Into<String>,
        metadata: Option<LyricsMetadata>,
    ) -> Self {
        let end_time = lines.iter().map(|l| l.time).max().unwrap_or(0);
        Self::from_parts(lines, end_time, source.into(), metadata)
    }

    pub(crate) const fn from_parts(
        lines: Vec<TimedLine>,
        end_time: u64,
        source: String,
        metadata: Option<LyricsMetadata>,
    ) -> Self {
        Self {
            lines: TimedLines { lines, end_time },
            source,
            metadata,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[TimedLine] {
        &self.lines.lines
    }

    /// Maximum `time` across all lines, 0 when empty
    #[must_use]
    pub const fn end_time(&self) -> u64 {
        self.lines.end_time
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn metadata(&self) -> Option<&LyricsMetadata> {
        self.metadata.as_ref()
    }

    /// An empty document means no lyrics were found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lines.len()
    }

    /// Effective end of the line at `index`: the next line's start, or the
    /// document end time for the last line.
    #[must_use]
    pub fn line_end(&self, index: usize) -> Option<u64> {
        if index >= self.len() {
            return None;
        }
        Some(
            self.lines
                .lines
                .get(index + 1)
                .map_or(self.lines.end_time, |next| next.time),
        )
    }

    /// Lyric text without timing, one line per entry
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.lines
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize to the JSON lyric format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from the JSON lyric format
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid lyrics document.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Accept integral or fractional millisecond values.
///
/// Documents written by older clients store unrounded float timestamps such as
/// `12340.000000000002`; those are rounded to the nearest millisecond.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "invalid millisecond value: {value}"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value.round() as u64)
}
