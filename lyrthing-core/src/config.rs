use crate::error::{CoreError, Result};
use crate::lrc::DEFAULT_SOURCE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyrthingConfig {
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Added to the playback position before classifying lines, so the
    /// highlight switches slightly ahead of the timestamp
    #[serde(default = "default_offset_ms")]
    pub offset_ms: i64,
    /// Label recorded on documents whose provider does not name itself
    #[serde(default = "default_source_label")]
    pub source_label: String,
    /// Directory searched for `.lrc` / LRCLIB `.json` files
    #[serde(default)]
    pub lyrics_dir: Option<PathBuf>,
}

/// Net -2.4 ms offset of the dashboard renderer, rounded to whole ms
const fn default_offset_ms() -> i64 {
    -2
}

fn default_source_label() -> String {
    DEFAULT_SOURCE.to_string()
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            offset_ms: default_offset_ms(),
            source_label: default_source_label(),
            lyrics_dir: None,
        }
    }
}

impl LyricsConfig {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn offset_ms_f64(&self) -> f64 {
        self.offset_ms as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How often the active line is recomputed
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

const fn default_tick_ms() -> u64 {
    150
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file
    #[serde(default)]
    pub enabled: bool,
}

impl LyrthingConfig {
    /// Get the configuration directory path (~/.config/lyrthing/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/lyrthing/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default path, creating a template on first run
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing the template, or an
    /// error if the file cannot be read, parsed or validated.
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::config_path())
    }

    /// Load config from `path`, creating a template there if it is missing
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing the template, or an
    /// error if the file cannot be read, parsed or validated.
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.playback.tick_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.tick_ms must be greater than 0".to_string(),
            });
        }
        if self.lyrics.source_label.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "lyrics.source_label must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"# lyrthing configuration
# ~/.config/lyrthing/config.toml

[lyrics]
# Added to the playback position before picking the active line (milliseconds).
# Positive values switch the highlight before the lyric timestamp,
# negative values hold it back.
offset_ms = -2
# Label recorded on documents whose provider does not supply one
source_label = "LRCLib"
# Directory with "<artist> - <title>.lrc" files
# lyrics_dir = "/home/me/Music/lyrics"

[playback]
# How often the active line is recomputed during playback (milliseconds)
tick_ms = 150

[logging]
# Also write logs to a file in the cache directory
enabled = false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = LyrthingConfig::from_toml(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, LyrthingConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LyrthingConfig::from_toml("").unwrap();
        assert_eq!(config.lyrics.offset_ms, -2);
        assert_eq!(config.lyrics.source_label, "LRCLib");
        assert_eq!(config.playback.tick_interval(), Duration::from_millis(150));
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_default_offset_does_not_activate_early() {
        let offset = LyrthingConfig::default().lyrics.offset_ms_f64();
        assert_eq!(offset, -2.0);

        assert!(!crate::timing::classify_line(950.0, 1000.0, 2000.0, offset).is_active);
        assert!(!crate::timing::classify_line(1001.0, 1000.0, 2000.0, offset).is_active);
        assert!(crate::timing::classify_line(1002.0, 1000.0, 2000.0, offset).is_active);
    }

    #[test]
    fn test_partial_config() {
        let config = LyrthingConfig::from_toml(
            "[lyrics]\noffset_ms = -2500\nlyrics_dir = \"/tmp/lyrics\"\n",
        )
        .unwrap();
        assert_eq!(config.lyrics.offset_ms, -2500);
        assert_eq!(config.lyrics.offset_ms_f64(), -2500.0);
        assert_eq!(config.lyrics.lyrics_dir, Some(PathBuf::from("/tmp/lyrics")));
        assert_eq!(config.playback.tick_ms, 150);
    }

    #[test]
    fn test_zero_tick_rejected() {
        let err = LyrthingConfig::from_toml("[playback]\ntick_ms = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = LyrthingConfig::from_toml("[lyrics\n").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParseError(_)));
    }

    #[test]
    fn test_load_or_create_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let err = LyrthingConfig::load_or_create_at(&path).unwrap_err();
        assert!(matches!(err, CoreError::ConfigNotFound { .. }));
        assert!(path.exists());

        let config = LyrthingConfig::load_or_create_at(&path).unwrap();
        assert_eq!(config, LyrthingConfig::default());
    }
}
