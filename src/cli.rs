use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a YouTube video and write French subtitles for it
    Process {
        /// YouTube video URL
        url: String,

        /// Output directory for subtitle files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Whisper model size (tiny, base, small, medium, large)
        #[arg(long)]
        whisper_model: Option<String>,

        /// Ollama model used for translation
        #[arg(long)]
        translation_model: Option<String>,

        /// Open the video in the player once subtitles are ready
        #[arg(long)]
        play: bool,
    },

    /// Process every URL listed in a file, one video at a time
    Batch {
        /// File with one YouTube URL per line (`#` starts a comment)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for subtitle files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seconds to wait between two videos
        #[arg(long)]
        pause: Option<u64>,
    },

    /// Build subtitles from a JSON transcript produced by `transcribe`
    Subtitle {
        /// Transcript file (JSON list of segments)
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Transcribe a local audio file to a JSON transcript
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output transcript file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Open a video in the player with a subtitle file
    Play {
        /// YouTube video URL
        url: String,

        /// Subtitle file
        #[arg(short, long)]
        subtitles: PathBuf,
    },

    /// Check that the external tools are installed
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
