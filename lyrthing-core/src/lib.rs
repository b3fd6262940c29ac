pub mod config;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod lrc;
pub mod paths;
pub mod playback;
pub mod provider;
pub mod providers;
pub mod store;
pub mod time;
pub mod timing;
pub mod tracker;

pub use config::{LoggingConfig, LyricsConfig, LyrthingConfig, PlaybackConfig};
pub use document::{LyricsMetadata, TimedLine, TimedLyricsDocument, INSTRUMENTAL_PLACEHOLDER};
pub use error::{CoreError, Result};
pub use fetcher::LyricsFetcher;
pub use lrc::{format_tag, parse_lrc, to_lrc, DEFAULT_SOURCE};
pub use paths::{config_dir, config_path, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use playback::{PlaybackState, TrackInfo};
pub use provider::{LookupOutcome, LyricsProvider, LyricsQuery, RawLyrics};
pub use providers::{DirectoryProvider, LrclibRecord};
pub use store::{LyricsStore, StoreEvent};
pub use time::{format_clock, DurationExt};
pub use timing::{classify_line, classify_line_at, LineStatus};
pub use tracker::{active_line, line_statuses, ActiveLineTracker};
