//! Track YouTube channels in a hosted row store.
//!
//! Paste a channel URL, and the [`ChannelResolver`] finds the channel on the platform; the
//! [`StoreClient`] saves its name and statistics as a row; [`VideoLookup`] shows a saved
//! channel's recent uploads or searches videos by keyword. The [`ViewController`] drives all
//! three from user actions and keeps the state a front end renders.

pub mod config;
pub mod controller;
mod error;
pub mod model;
pub mod paging;
pub mod resolver;
pub mod store;
pub mod videos;
pub mod youtube_api;

pub use config::Config;
pub use controller::{Page, ViewController, ViewState};
pub use error::{Error, Result};
pub use model::{Channel, ChannelDraft, Video};
pub use resolver::{ChannelResolver, extract_channel_token};
pub use store::StoreClient;
pub use videos::VideoLookup;
