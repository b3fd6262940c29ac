//! Lyrics lookup from a local directory of sidecar files.
//!
//! For a query with artist `A` and track `T`, the provider tries, in order:
//! `A - T.lrc`, `T.lrc`, then `A - T.json` (an LRCLIB record).

use crate::document::LyricsMetadata;
use crate::error::CoreError;
use crate::provider::{LookupOutcome, LyricsProvider, LyricsQuery, RawLyrics};
use crate::providers::lrclib;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOG_TARGET: &str = "lyrthing::provider::directory";

/// Source label recorded on documents read from `.lrc` files
pub const DIRECTORY_SOURCE: &str = "Local";

/// Reads `.lrc` and LRCLIB `.json` files from a directory
pub struct DirectoryProvider {
    dir: PathBuf,
}

enum Candidate {
    Lrc(PathBuf),
    LrclibJson(PathBuf),
}

impl DirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn candidates(&self, query: &LyricsQuery) -> Vec<Candidate> {
        let track = sanitize_file_stem(&query.track_name);
        let mut candidates = Vec::with_capacity(3);

        let paired = query
            .artist_name
            .as_deref()
            .map(|artist| format!("{} - {track}", sanitize_file_stem(artist)));

        if let Some(ref stem) = paired {
            candidates.push(Candidate::Lrc(self.dir.join(format!("{stem}.lrc"))));
        }
        candidates.push(Candidate::Lrc(self.dir.join(format!("{track}.lrc"))));
        if let Some(ref stem) = paired {
            candidates.push(Candidate::LrclibJson(self.dir.join(format!("{stem}.json"))));
        }

        candidates
    }
}

/// Read a file, mapping "not found" to `None`
async fn read_optional(path: &Path) -> Result<Option<String>, CoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace characters that cannot appear in file names
fn sanitize_file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[async_trait]
impl LyricsProvider for DirectoryProvider {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, query: &LyricsQuery) -> Result<LookupOutcome, CoreError> {
        for candidate in self.candidates(query) {
            match candidate {
                Candidate::Lrc(path) => {
                    debug!(target: LOG_TARGET, "Trying {}", path.display());
                    if let Some(content) = read_optional(&path).await? {
                        info!(target: LOG_TARGET, "Found lyrics file {}", path.display());
                        let metadata = LyricsMetadata::new(
                            query.artist_name.as_deref().unwrap_or_default(),
                            &query.track_name,
                            query.album_name.as_deref().unwrap_or_default(),
                        );
                        return Ok(LookupOutcome::Found(RawLyrics {
                            synced_lyrics: content,
                            metadata,
                            source: Some(DIRECTORY_SOURCE.to_string()),
                        }));
                    }
                }
                Candidate::LrclibJson(path) => {
                    debug!(target: LOG_TARGET, "Trying {}", path.display());
                    if let Some(content) = read_optional(&path).await? {
                        info!(target: LOG_TARGET, "Found LRCLIB record {}", path.display());
                        return lrclib::parse_response(&content).map_err(|e| {
                            CoreError::LyricsProviderFailed {
                                provider: self.name().to_string(),
                                reason: format!("{}: {e}", path.display()),
                            }
                        });
                    }
                }
            }
        }

        debug!(
            target: LOG_TARGET,
            "No lyrics files for {:?} in {}",
            query.track_name,
            self.dir.display()
        );
        Ok(LookupOutcome::NotFound)
    }
}
