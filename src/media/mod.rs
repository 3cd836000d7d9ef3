// External tool plumbing
//
// - commands: builder and runner for external programs
// - player: playback launcher showing a video with its subtitles

pub mod commands;
pub mod player;

pub use commands::*;
pub use player::*;
