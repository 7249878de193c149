//! Playlist generation module
//!
//! This module turns library items into M3U8 playlists:
//! - Classification of item kinds into generation strategies
//! - Episode and season naming rules
//! - Download and nested playlist URLs
//! - Document assembly

pub mod classify;
pub mod m3u8;
pub mod synth;
pub mod url;

pub use synth::Synthesizer;
