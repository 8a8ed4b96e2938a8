//! Recent uploads of a saved channel, and free-text video search.

use crate::model::{Channel, Video, coerce_opt_count, sort_newest_first};
use crate::youtube_api::search::SearchResult;
use crate::youtube_api::videos::VideoStatistics;
use crate::youtube_api::{VideoSearch, YouTubeClient};
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::instrument;

/// How many uploads the channel detail view shows.
pub const RECENT_VIDEOS_LIMIT: u32 = 10;
/// How many results a free-text search returns.
pub const SEARCH_RESULTS_LIMIT: u32 = 14;
/// Channel hits considered when re-resolving a channel from its display name.
const NAME_SEARCH_CANDIDATES: u32 = 5;

#[derive(Debug, Clone)]
pub struct VideoLookup {
    yt: YouTubeClient,
}

impl VideoLookup {
    pub fn new(yt: YouTubeClient) -> Self {
        Self { yt }
    }

    /// The newest uploads of a saved channel, newest first, with statistics.
    ///
    /// Rows saved with a platform id use it directly. Older rows only know the display name, so
    /// the channel is searched for by that name: an exact title match wins, then the first hit,
    /// then the first hit for just the name's first word. That fallback can land on the wrong
    /// channel when names are ambiguous. Fails with [`Error::NotFound`] if nothing matches.
    #[instrument(skip(self, channel), fields(row_id = channel.id, name = %channel.name))]
    pub async fn recent_videos(&self, channel: &Channel) -> Result<Vec<Video>> {
        let channel_id = match &channel.platform_id {
            Some(id) => id.clone(),
            None => self.channel_id_for_name(&channel.name).await?,
        };

        let hits = self
            .yt
            .search_videos(VideoSearch::Channel(&channel_id), RECENT_VIDEOS_LIMIT)
            .await?;
        self.enrich(hits.into_iter().collect()).await
    }

    /// Searches videos by free text, newest first, with statistics.
    ///
    /// An empty or blank term fails with [`Error::Validation`] before any request.
    #[instrument(skip(self))]
    pub async fn search_videos(&self, term: &str) -> Result<Vec<Video>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::Validation("search term is required".into()));
        }

        let hits = self
            .yt
            .search_videos(VideoSearch::Term(term), SEARCH_RESULTS_LIMIT)
            .await?;
        self.enrich(hits.into_iter().collect()).await
    }

    /// Finds the platform channel id for a display name.
    async fn channel_id_for_name(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::NotFound("channel has no name to search for".into()));
        }

        let hits = Vec::from(self.yt.search_channels(name, NAME_SEARCH_CANDIDATES).await?);
        if let Some(id) = pick_channel(&hits, name) {
            return Ok(id);
        }

        if let Some(first_word) = name.split_whitespace().next().filter(|w| *w != name) {
            tracing::debug!(name, first_word, "no hit for full name, retrying with first word");
            let hits = Vec::from(self.yt.search_channels(first_word, 1).await?);
            if let Some(id) = pick_channel(&hits, name) {
                return Ok(id);
            }
        }

        Err(Error::NotFound(format!("could not find channel {name:?} on the platform")))
    }

    /// Attaches statistics to search hits and orders them newest first.
    async fn enrich(&self, hits: Vec<SearchResult>) -> Result<Vec<Video>> {
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = hits
            .iter()
            .filter_map(|hit| hit.id.video_id.as_deref())
            .collect();
        let stats = self.yt.get_video_statistics(&ids).await?;
        let stats: HashMap<String, VideoStatistics> =
            stats.into_iter().map(|v| (v.id, v.statistics)).collect();

        Ok(merge_statistics(hits, &stats))
    }
}

/// Prefers a hit whose title equals `name`, then falls back to the first channel hit.
fn pick_channel(hits: &[SearchResult], name: &str) -> Option<String> {
    hits.iter()
        .filter(|hit| hit.id.channel_id.is_some())
        .find(|hit| hit.snippet.plain_title() == name)
        .or_else(|| hits.iter().find(|hit| hit.id.channel_id.is_some()))
        .and_then(|hit| hit.id.channel_id.clone())
}

/// Builds [`Video`]s from search hits and a statistics lookup, newest first.
///
/// A hit without statistics gets all-zero counts instead of failing the batch.
fn merge_statistics(
    hits: Vec<SearchResult>,
    stats: &HashMap<String, VideoStatistics>,
) -> Vec<Video> {
    let mut videos: Vec<Video> = hits
        .into_iter()
        .filter_map(|hit| {
            let id = hit.id.video_id?;
            let (view_count, like_count, comment_count) = match stats.get(&id) {
                Some(s) => (
                    coerce_opt_count(s.view_count.as_deref()),
                    coerce_opt_count(s.like_count.as_deref()),
                    coerce_opt_count(s.comment_count.as_deref()),
                ),
                None => {
                    tracing::warn!(video_id = %id, "no statistics returned for video");
                    (0, 0, 0)
                }
            };
            Some(Video {
                title: hit.snippet.plain_title(),
                published_at: hit.snippet.published_at,
                thumbnail_url: hit.snippet.thumbnails.best_url().to_string(),
                id,
                view_count,
                like_count,
                comment_count,
            })
        })
        .collect();

    sort_newest_first(&mut videos);
    videos
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn video_hit(id: &str, published_at: &str) -> SearchResult {
        serde_json::from_value(json!({
            "id": { "kind": "youtube#video", "videoId": id },
            "snippet": {
                "publishedAt": published_at,
                "title": format!("video {id}"),
                "thumbnails": { "default": { "url": format!("https://i.ytimg.com/vi/{id}/default.jpg") } }
            }
        }))
        .unwrap()
    }

    fn channel_hit(id: &str, title: &str) -> SearchResult {
        serde_json::from_value(json!({
            "id": { "kind": "youtube#channel", "channelId": id },
            "snippet": { "publishedAt": "2010-01-01T00:00:00Z", "title": title }
        }))
        .unwrap()
    }

    #[test]
    fn missing_statistics_default_to_zero() {
        let hits = vec![
            video_hit("a", "2024-01-01T00:00:00Z"),
            video_hit("b", "2024-01-02T00:00:00Z"),
        ];
        let stats = HashMap::from([(
            "a".to_string(),
            VideoStatistics {
                view_count: Some("100".into()),
                like_count: Some("5".into()),
                comment_count: None,
            },
        )]);

        let videos = merge_statistics(hits, &stats);

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].id, "b");
        assert_eq!(
            (videos[0].view_count, videos[0].like_count, videos[0].comment_count),
            (0, 0, 0)
        );
        assert_eq!(videos[1].id, "a");
        assert_eq!(
            (videos[1].view_count, videos[1].like_count, videos[1].comment_count),
            (100, 5, 0)
        );
        assert_eq!(videos[1].thumbnail_url, "https://i.ytimg.com/vi/a/default.jpg");
    }

    #[test]
    fn sorted_newest_first_regardless_of_input() {
        let hits = vec![
            video_hit("t1", "2024-05-03T00:00:00Z"),
            video_hit("t3", "2024-05-01T00:00:00Z"),
            video_hit("t2", "2024-05-02T00:00:00Z"),
        ];
        let ids: Vec<_> = merge_statistics(hits, &HashMap::new())
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, ["t1", "t2", "t3"]);
    }

    #[test]
    fn exact_title_preferred() {
        let hits = vec![
            channel_hit("UC_fan", "Veritasium Clips"),
            channel_hit("UC_real", "Veritasium"),
        ];
        assert_eq!(pick_channel(&hits, "Veritasium").as_deref(), Some("UC_real"));
        assert_eq!(pick_channel(&hits, "Derek").as_deref(), Some("UC_fan"));
        assert_eq!(pick_channel(&[], "Derek"), None);
    }
}
