//! The page-level state machine tying the resolver, the store and video lookup together.
//!
//! There are three pages:
//!
//! - [`Page::Home`]: the saved channel table and the "add channel" form
//! - [`Page::ChannelDetail`]: one saved channel and its recent uploads
//! - [`Page::Search`]: free-text video search
//!
//! Every action is user-triggered and takes `&mut self`, so one action completes before the
//! next begins and a result can never land on a page the user has already left. Errors never
//! escape: they become [`ViewState::error`] and the view stays on, or falls back to, a stable
//! page.

use crate::model::{Channel, ChannelDraft, Video};
use crate::resolver::ChannelResolver;
use crate::store::StoreClient;
use crate::videos::VideoLookup;
use crate::youtube_api::YouTubeClient;
use crate::{Config, Error, Result};
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    ChannelDetail(Channel),
    Search,
}

/// Everything the front end needs to render the current page.
#[derive(Debug, Default)]
pub struct ViewState {
    pub page: Page,
    /// Saved channels, in store order.
    pub channels: Vec<Channel>,
    /// Videos for the detail or search page; empty on home.
    pub videos: Vec<Video>,
    /// Contents of the "add channel" input.
    pub channel_url: String,
    /// Contents of the search input.
    pub search_query: String,
    /// The one message shown to the user, if the last action failed.
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ViewController {
    resolver: ChannelResolver,
    store: StoreClient,
    videos: VideoLookup,
    state: ViewState,
}

impl ViewController {
    pub fn new(resolver: ChannelResolver, store: StoreClient, videos: VideoLookup) -> Self {
        Self {
            resolver,
            store,
            videos,
            state: ViewState::default(),
        }
    }

    /// Wires up every component from one configuration, sharing a single HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = config.http_client()?;
        let yt = YouTubeClient::new(config.youtube.clone(), http.clone());
        Ok(Self::new(
            ChannelResolver::new(yt.clone()),
            StoreClient::new(config.store.clone(), http),
            VideoLookup::new(yt),
        ))
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    fn report(&mut self, error: Error) {
        tracing::warn!(%error, "action failed");
        self.state.error = Some(error.to_string());
    }

    /// Goes to the home page and reloads the saved channels.
    #[instrument(skip(self))]
    pub async fn show_home(&mut self) {
        self.state.page = Page::Home;
        self.state.videos.clear();
        self.state.error = None;

        match self.store.list().await {
            Ok(channels) => self.state.channels = channels,
            Err(e) => {
                self.state.channels.clear();
                self.report(e);
            }
        }
    }

    /// Resolves a channel URL and saves the channel.
    ///
    /// On success the new row is appended to the table and the input is cleared. On failure
    /// the input is kept so the user can correct it.
    #[instrument(skip(self))]
    pub async fn submit_channel(&mut self, url: &str) {
        self.state.channel_url = url.to_string();
        self.state.error = None;

        match self.resolve_and_save(url).await {
            Ok(channel) => {
                self.state.channels.push(channel);
                self.state.channel_url.clear();
            }
            Err(e) => self.report(e),
        }
    }

    async fn resolve_and_save(&self, url: &str) -> Result<Channel> {
        let resolved = self.resolver.resolve(url).await?;
        self.store.create(&ChannelDraft::from(&resolved)).await
    }

    /// Deletes the saved channel with this name.
    #[instrument(skip(self))]
    pub async fn delete_channel(&mut self, name: &str) {
        self.state.error = None;

        match self.store.delete_by_name(name).await {
            Ok(deleted) => self.state.channels.retain(|c| c.id != deleted.id),
            Err(e) => self.report(e),
        }
    }

    /// Opens the detail page of a saved channel and loads its recent videos.
    ///
    /// Videos from the previous page are cleared before the fetch starts. If the channel is
    /// unknown or its videos can't be loaded, the view returns home.
    #[instrument(skip(self))]
    pub async fn open_channel(&mut self, name: &str) {
        self.state.error = None;

        let Some(channel) = self.state.channels.iter().find(|c| c.name == name).cloned() else {
            self.state.page = Page::Home;
            self.report(Error::NotFound(format!("no saved channel named {name:?}")));
            return;
        };

        self.state.page = Page::ChannelDetail(channel.clone());
        self.state.videos.clear();

        match self.videos.recent_videos(&channel).await {
            Ok(videos) => self.state.videos = videos,
            Err(e) => {
                self.state.page = Page::Home;
                self.report(e);
            }
        }
    }

    /// Switches to the search page with an empty query and no results.
    pub fn open_search(&mut self) {
        self.state.page = Page::Search;
        self.state.videos.clear();
        self.state.search_query.clear();
        self.state.error = None;
    }

    /// Runs a free-text video search, entering the search page first if needed.
    #[instrument(skip(self))]
    pub async fn submit_search(&mut self, term: &str) {
        if self.state.page != Page::Search {
            self.open_search();
        }
        self.state.search_query = term.to_string();
        self.state.error = None;

        match self.videos.search_videos(term).await {
            Ok(videos) => self.state.videos = videos,
            Err(e) => {
                self.state.videos.clear();
                self.report(e);
            }
        }
    }
}
