//! Jellyfin backend
//!
//! Library lookups and caller authentication against a Jellyfin server.

pub mod client;
pub mod types;

pub use client::JellyfinClient;
