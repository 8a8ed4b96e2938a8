//! Minimal YouTube Data API v3 client for public, API-key authenticated lookups.
//!
//! Only the read-only endpoints the tracker needs are covered:
//!
//! - `channels.list` to fetch a channel's title and statistics
//! - `search.list` to find channels by keyword and videos by channel or keyword
//! - `videos.list` to fetch per-video statistics in one batched call
//!
//! Every request carries the static API key as the `key` query parameter; no OAuth is involved.
//! The response types mirror the subset of the upstream resources that is actually read, with
//! optional fields wherever YouTube omits data (for example `items` on an empty result).

pub mod channels;
pub mod client;
pub mod search;
pub mod types;
pub mod videos;

pub use client::{VideoSearch, YouTubeClient};
