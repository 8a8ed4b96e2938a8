//! YouTube Search API types.

use crate::youtube_api::types::{PageInfo, Thumbnails};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `search.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchListResponse {
    /// The value will be `youtube#searchListResponse`.
    pub kind: String,
    #[serde(default)]
    pub items: VecDeque<SearchResult>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A search result points at a channel, video or playlist, depending on `id.kind`.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: ResourceId,
    pub snippet: SearchSnippet,
}

/// Identifies the resource a [`SearchResult`] refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceId {
    /// `youtube#channel`, `youtube#video` or `youtube#playlist`.
    pub kind: String,
    #[serde(rename = "channelId", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(rename = "videoId", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSnippet {
    /// Creation time of the resource the result points at.
    #[serde(rename = "publishedAt")]
    pub published_at: Timestamp,
    #[serde(rename = "channelId", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Title as returned by the search endpoint, which HTML-escapes it (`&amp;`, `&#39;`).
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(rename = "channelTitle", skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
}

impl SearchSnippet {
    /// The title with HTML entities decoded.
    pub fn plain_title(&self) -> String {
        html_escape::decode_html_entities(&self.title).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_search_has_no_items() {
        let response: SearchListResponse = serde_json::from_value(serde_json::json!({
            "kind": "youtube#searchListResponse",
            "pageInfo": { "totalResults": 0, "resultsPerPage": 0 }
        }))
        .unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn decodes_escaped_titles() {
        let result: SearchResult = serde_json::from_value(serde_json::json!({
            "id": { "kind": "youtube#channel", "channelId": "UC1" },
            "snippet": {
                "publishedAt": "2015-06-01T10:00:00Z",
                "channelId": "UC1",
                "title": "Tom &amp; Jerry&#39;s",
            }
        }))
        .unwrap();
        assert_eq!(result.snippet.plain_title(), "Tom & Jerry's");
        assert_eq!(result.id.channel_id.as_deref(), Some("UC1"));
    }
}
