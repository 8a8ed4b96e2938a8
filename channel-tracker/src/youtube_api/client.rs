//! HTTP plumbing for the YouTube Data API.

use crate::config::YouTubeConfig;
use crate::youtube_api::{
    channels::{Channel, ChannelListResponse},
    search::{SearchListResponse, SearchResult},
    videos::{Video, VideoListResponse},
};
use crate::{Error, Result};
use http::Method;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use tracing::instrument;

/// `videos.list` accepts at most this many ids per call.
const MAX_IDS_PER_VIDEOS_CALL: usize = 50;

/// What a video search should be scoped to.
#[derive(Debug, Clone, Copy)]
pub enum VideoSearch<'a> {
    /// The most recent uploads of one channel, newest first.
    Channel(&'a str),
    /// A free-text search across the platform.
    Term(&'a str),
}

/// Client for the public YouTube Data API v3.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    config: YouTubeConfig,
    client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Makes a key-authenticated `GET` to `{base_url}/{resource}` and decodes the JSON body.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies all become
    /// [`Error::UpstreamUnavailable`]. For error statuses the message is YouTube's own
    /// `error.message` when present, otherwise the raw body.
    #[instrument(skip(self, query_params), level = tracing::Level::TRACE)]
    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query_params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url, resource);

        let response = self
            .client
            .request(Method::GET, &url)
            .query(query_params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(Error::upstream_transport)?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(%status_code, resource, "YouTube API request failed");
            return Err(Error::UpstreamUnavailable {
                status: Some(status_code.as_u16()),
                message: upstream_error_message(&error_text),
            });
        }

        response.json().await.map_err(|e| Error::UpstreamUnavailable {
            status: None,
            message: format!("parse YouTube {resource} response: {e}"),
        })
    }

    /// Looks up a single channel by its id, including title and statistics.
    ///
    /// Returns `Ok(None)` when the id does not name a channel.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self))]
    pub async fn get_channel(&self, channel_id: &str) -> Result<Option<Channel>> {
        let query_params = [("part", "snippet,statistics"), ("id", channel_id)];
        let channels: ChannelListResponse = self.get("channels", &query_params).await?;

        tracing::debug!(
            channel_id,
            returned_items = channels.items.len(),
            "fetched channel"
        );

        Ok(channels.items.into_iter().next())
    }

    /// Searches channels by keyword, in YouTube's relevance order.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<VecDeque<SearchResult>> {
        let max_results_string = max_results.to_string();
        let query_params = [
            ("part", "snippet"),
            ("type", "channel"),
            ("q", query),
            ("maxResults", max_results_string.as_str()),
        ];
        let results: SearchListResponse = self.get("search", &query_params).await?;

        tracing::debug!(
            total_results = results.page_info.total_results,
            returned_items = results.items.len(),
            "searched channels"
        );

        Ok(results.items)
    }

    /// Searches videos, either the newest uploads of a channel or by free text.
    ///
    /// Only results that actually carry a video id are returned.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn search_videos(
        &self,
        search: VideoSearch<'_>,
        max_results: u32,
    ) -> Result<VecDeque<SearchResult>> {
        let max_results_string = max_results.to_string();
        let mut query_params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", max_results_string.as_str()),
        ];
        match search {
            VideoSearch::Channel(channel_id) => {
                query_params.push(("channelId", channel_id));
                query_params.push(("order", "date"));
            }
            VideoSearch::Term(term) => query_params.push(("q", term)),
        }

        let results: SearchListResponse = self.get("search", &query_params).await?;

        tracing::debug!(
            total_results = results.page_info.total_results,
            returned_items = results.items.len(),
            "searched videos"
        );

        Ok(results
            .items
            .into_iter()
            .filter(|r| r.id.video_id.is_some())
            .collect())
    }

    /// Fetches statistics for many videos at once.
    ///
    /// Ids are sent comma-separated, in as few calls as the API allows. Unknown ids are silently
    /// missing from the result.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self, video_ids), fields(count = video_ids.len()))]
    pub async fn get_video_statistics(&self, video_ids: &[&str]) -> Result<Vec<Video>> {
        let mut videos = Vec::with_capacity(video_ids.len());
        for chunk in video_ids.chunks(MAX_IDS_PER_VIDEOS_CALL) {
            let ids = chunk.join(",");
            let query_params = [("part", "statistics"), ("id", ids.as_str())];
            let response: VideoListResponse = self.get("videos", &query_params).await?;
            tracing::debug!(
                requested = chunk.len(),
                returned_items = response.items.len(),
                "fetched video statistics"
            );
            videos.extend(response.items);
        }
        Ok(videos)
    }
}

/// Pulls `error.message` out of a Google API error body, falling back to the body itself.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
