//! YouTube Videos API types.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `videos.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// The value will be `youtube#videoListResponse`.
    pub kind: String,
    /// Videos that were found; ids that don't resolve are simply absent.
    #[serde(default)]
    pub items: VecDeque<Video>,
}

/// A `video` resource with only the statistics part requested.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

/// Statistics about the video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VideoStatistics {
    /// The number of times the video has been viewed.
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    /// The number of users who have indicated that they liked the video.
    /// Absent when the owner hides likes.
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    /// The number of comments for the video. Absent when comments are disabled.
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
}
