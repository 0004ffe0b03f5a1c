//! YouTube Search API response types.

use crate::youtube_api::types::Thumbnails;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Response structure for one page of the `search.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchListResponse {
    /// Search results matching the query, in relevance/date order.
    #[serde(default)]
    pub items: Vec<SearchResult>,
    /// Token that can be used as the `pageToken` parameter to retrieve the
    /// next page in the result set.
    #[serde(rename = "nextPageToken", skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A single `search` resource.
///
/// Search results identify the matched video but carry only snippet-level
/// metadata; statistics come from a follow-up `videos.list` lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<SearchSnippet>,
}

/// The id block of a search result. We request `type=video`, so the video
/// id is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

/// Snippet-level metadata for a search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSnippet {
    #[serde(rename = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Title of the channel that published the video. Preserved through
    /// the statistics lookup by the snippet merge in
    /// [`crate::aggregate`].
    #[serde(rename = "channelTitle", skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(rename = "channelId", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}
