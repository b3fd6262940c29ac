use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lyrthing", version, about = "Parse LRC lyrics and follow the active line")]
pub struct Cli {
    /// Config file (defaults to ~/.config/lyrthing/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a lyrics file and print the document as JSON
    Parse {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show every line's status at a playback position
    Status {
        #[command(flatten)]
        input: InputArgs,
        /// Playback position in milliseconds
        #[arg(long)]
        at: f64,
        /// Offset in milliseconds (defaults to lyrics.offset_ms)
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,
    },
    /// Simulate playback and print each line as it becomes active
    Play {
        #[command(flatten)]
        input: InputArgs,
        /// Start position in milliseconds
        #[arg(long, default_value_t = 0)]
        from: u64,
        /// Offset in milliseconds (defaults to lyrics.offset_ms)
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,
    },
    /// Look up lyrics in a directory and print the document as JSON
    Fetch {
        /// Directory of "<artist> - <title>.lrc" files (defaults to lyrics.lyrics_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        artist: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        album: Option<String>,
    },
}

/// Lyrics file plus the metadata attached to the parsed document
#[derive(Debug, Args)]
pub struct InputArgs {
    /// LRC file, or an LRCLIB JSON response with --lrclib-json
    pub file: PathBuf,
    /// Treat the file as an LRCLIB API response
    #[arg(long)]
    pub lrclib_json: bool,
    #[arg(long, default_value = "")]
    pub artist: String,
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub album: String,
    /// Source label (defaults to lyrics.source_label)
    #[arg(long)]
    pub source: Option<String>,
}
