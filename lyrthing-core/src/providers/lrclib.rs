//! LRCLIB response mapping.
//!
//! The HTTP lookup happens outside this crate; this module turns the JSON body
//! of an LRCLIB `get` (single record) or `search` (array) response into a
//! [`LookupOutcome`].

use crate::document::LyricsMetadata;
use crate::error::Result;
use crate::provider::{LookupOutcome, RawLyrics};
use serde::Deserialize;
use tracing::debug;

const LOG_TARGET: &str = "lyrthing::provider::lrclib";

/// Source label recorded on documents built from LRCLIB records
pub const LRCLIB_SOURCE: &str = "LRCLib";

/// One LRCLIB lyrics record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LrclibRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub instrumental: bool,
    #[serde(default)]
    pub plain_lyrics: Option<String>,
    #[serde(default)]
    pub synced_lyrics: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LrclibBody {
    Single(LrclibRecord),
    Many(Vec<LrclibRecord>),
}

impl LrclibRecord {
    /// Whether the record carries non-blank synced lyrics
    #[must_use]
    pub fn has_synced(&self) -> bool {
        !self.instrumental
            && self
                .synced_lyrics
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty())
    }

    #[must_use]
    pub fn metadata(&self) -> LyricsMetadata {
        LyricsMetadata::new(
            &self.artist_name,
            &self.track_name,
            self.album_name.as_deref().unwrap_or_default(),
        )
    }

    /// Map to a lookup outcome; instrumental tracks and records without
    /// synced lyrics count as not found.
    #[must_use]
    pub fn into_outcome(self) -> LookupOutcome {
        if !self.has_synced() {
            debug!(
                target: LOG_TARGET,
                "No synced lyrics in LRCLIB record {:?} (instrumental: {})",
                self.id, self.instrumental
            );
            return LookupOutcome::NotFound;
        }

        let metadata = self.metadata();
        LookupOutcome::Found(RawLyrics {
            synced_lyrics: self.synced_lyrics.unwrap_or_default(),
            metadata,
            source: Some(LRCLIB_SOURCE.to_string()),
        })
    }
}

/// Pick the first record with usable synced lyrics
#[must_use]
pub fn select_best(records: Vec<LrclibRecord>) -> Option<LrclibRecord> {
    records.into_iter().find(LrclibRecord::has_synced)
}

/// Map an LRCLIB response body (object or array) to a lookup outcome.
///
/// # Errors
///
/// Returns an error if the body is not a record or list of records.
pub fn parse_response(body: &str) -> Result<LookupOutcome> {
    let outcome = match serde_json::from_str::<LrclibBody>(body)? {
        LrclibBody::Single(record) => record.into_outcome(),
        LrclibBody::Many(records) => {
            debug!(target: LOG_TARGET, "LRCLIB search returned {} records", records.len());
            select_best(records).map_or(LookupOutcome::NotFound, LrclibRecord::into_outcome)
        }
    };
    Ok(outcome)
}
