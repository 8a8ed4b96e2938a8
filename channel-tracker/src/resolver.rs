//! Turning a pasted channel URL into a canonical channel record.

use crate::youtube_api::YouTubeClient;
use crate::youtube_api::channels::Channel;
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

/// Accepts `youtube.com/channel/<id>`, `youtube.com/c/<name>`, `youtube.com/@<handle>` and
/// `youtu.be/<token>`, with or without scheme and `www.`. The token ends at a slash,
/// whitespace, `?` or `#`.
static CHANNEL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/(?:channel/|c/|@)|youtu\.be/)([^\s/?#]+)")
        .expect("channel URL pattern is valid")
});

/// Extracts the identifier token from a channel URL.
///
/// Depending on the URL shape the token is a channel id, a custom name or a handle; resolving
/// it is [`ChannelResolver::resolve`]'s job.
pub fn extract_channel_token(url: &str) -> Result<&str> {
    CHANNEL_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            Error::InvalidUrl(format!(
                "{url:?} is not a channel URL (expected e.g. https://youtube.com/@handle)"
            ))
        })
}

/// Resolves user-supplied URLs against the video platform. Read-only.
#[derive(Debug, Clone)]
pub struct ChannelResolver {
    yt: YouTubeClient,
}

impl ChannelResolver {
    pub fn new(yt: YouTubeClient) -> Self {
        Self { yt }
    }

    /// Resolves a channel URL to the channel's title and statistics.
    ///
    /// The token is first tried as a channel id. If that finds nothing, the token is used as a
    /// search keyword and the first channel hit is taken. Fails with [`Error::InvalidUrl`]
    /// before any request when no token can be extracted, and with [`Error::NotFound`] when
    /// neither lookup finds a channel.
    #[instrument(skip(self))]
    pub async fn resolve(&self, url: &str) -> Result<Channel> {
        let token = extract_channel_token(url)?;
        tracing::debug!(token, "extracted channel token");

        if let Some(channel) = self.yt.get_channel(token).await? {
            return Ok(channel);
        }

        tracing::debug!(token, "token is not a channel id, searching by keyword");
        let channel_id = self
            .yt
            .search_channels(token, 1)
            .await?
            .into_iter()
            .find_map(|hit| hit.id.channel_id)
            .ok_or_else(|| Error::NotFound(format!("no channel matches {token:?}")))?;

        self.yt
            .get_channel(&channel_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("channel {channel_id} has no details")))
    }
}
