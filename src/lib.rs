//! Emanet - Turkish to French subtitle workflow
//!
//! Downloads a YouTube video's audio with yt-dlp, transcribes the Turkish
//! speech with whisper, translates every segment to French through ollama
//! and writes an SRT file that can be played alongside the video in VLC.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod media;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod segment;
pub mod setup;
pub mod subtitle;
pub mod transcribe;
pub mod translate;
pub mod workflow;
