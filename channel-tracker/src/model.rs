//! Semantic records shared between the components.

use jiff::Timestamp;
use serde::Serialize;

/// A channel summary persisted in the row store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Row identifier assigned by the store.
    pub id: u64,
    pub name: String,
    pub views: u64,
    pub subscribers: u64,
    pub video_count: u64,
    /// The platform's own channel id, for rows saved with one.
    pub platform_id: Option<String>,
}

/// Loosely-typed input to [`StoreClient::create`](crate::StoreClient::create).
///
/// Counts are kept as the text the platform reported them as; the store's mapping layer decides
/// how they become numbers (see [`coerce_count_str`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDraft {
    pub name: Option<String>,
    pub views: Option<String>,
    pub subscribers: Option<String>,
    pub video_count: Option<String>,
    pub platform_id: Option<String>,
}

/// A video as shown in the channel detail and search views. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub published_at: Timestamp,
    pub thumbnail_url: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

/// Best-effort count parsing.
///
/// Takes the leading decimal digits after trimming whitespace, so `"12"`, `" 12 "` and `"12.7"`
/// all give 12. Anything without leading digits (empty, negative, words) gives 0. Overflow
/// saturates at [`u64::MAX`]. A missing or odd count is never an error.
pub fn coerce_count_str(raw: &str) -> u64 {
    let digits: &str = {
        let trimmed = raw.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

pub(crate) fn coerce_opt_count(raw: Option<&str>) -> u64 {
    raw.map(coerce_count_str).unwrap_or(0)
}

/// Orders videos newest first, regardless of the order they were fetched in.
pub fn sort_newest_first(videos: &mut [Video]) {
    videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn coerce_counts() {
        assert_eq!(coerce_count_str("1234"), 1234);
        assert_eq!(coerce_count_str("  56 "), 56);
        assert_eq!(coerce_count_str("12.7"), 12);
        assert_eq!(coerce_count_str("9abc"), 9);
        assert_eq!(coerce_count_str(""), 0);
        assert_eq!(coerce_count_str("-3"), 0);
        assert_eq!(coerce_count_str("lots"), 0);
        assert_eq!(coerce_count_str("99999999999999999999999"), u64::MAX);
        assert_eq!(coerce_opt_count(None), 0);
    }

    fn video(id: &str, published_at: &str) -> Video {
        Video {
            id: id.into(),
            title: id.into(),
            published_at: published_at.parse().unwrap(),
            thumbnail_url: String::new(),
            view_count: 0,
            like_count: 0,
            comment_count: 0,
        }
    }

    #[test]
    fn newest_first() {
        let mut videos = vec![
            video("t1", "2024-03-01T00:00:00Z"),
            video("t3", "2024-01-01T00:00:00Z"),
            video("t2", "2024-02-01T00:00:00Z"),
        ];
        sort_newest_first(&mut videos);
        let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["t1", "t2", "t3"]);
    }
}
