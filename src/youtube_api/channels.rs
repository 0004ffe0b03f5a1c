//! YouTube Channels API response types.

use crate::error::Error;
use crate::youtube_api::types::Thumbnails;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Response structure for the `channels.list` API call, and the shape we
/// cache per channel id.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels/list>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
    #[serde(rename = "nextPageToken", skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A `channel` resource.
///
/// The content-details block carries the channel's distinguished "uploads"
/// playlist id, which is the entry point for listing the channel's
/// published videos.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelItem {
    /// The ID that YouTube uses to uniquely identify the channel.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<ChannelSnippet>,
    #[serde(rename = "contentDetails", skip_serializing_if = "Option::is_none")]
    pub content_details: Option<ChannelContentDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ChannelStatistics>,
}

impl ChannelItem {
    /// The id of the channel's uploads playlist, if the API reported one.
    pub fn uploads_playlist(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.related_playlists.as_ref())
            .and_then(|playlists| playlists.uploads.as_deref())
    }

    /// Parses the channel's published-video count out of its statistics
    /// block.
    ///
    /// Like every count, the API transports this as a decimal string. An
    /// absent or malformed value is a [`Error::DataIntegrity`] error, not
    /// a zero.
    pub fn video_count(&self) -> Result<u64, Error> {
        let raw = self
            .statistics
            .as_ref()
            .and_then(|statistics| statistics.video_count.as_deref())
            .unwrap_or("");
        raw.parse().map_err(|_| Error::DataIntegrity {
            field: "statistics.videoCount",
            value: raw.to_string(),
        })
    }
}

/// Basic details about a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnippet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "customUrl", skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(rename = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Pointers to the channel's system playlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists", skip_serializing_if = "Option::is_none")]
    pub related_playlists: Option<RelatedPlaylists>,
}

/// The system playlists YouTube maintains for a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedPlaylists {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<String>,
    /// Playlist containing every video the channel has published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploads: Option<String>,
}

/// Statistics about a channel, transported as decimal strings like video
/// statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatistics {
    #[serde(rename = "viewCount", skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(rename = "subscriberCount", skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<String>,
    #[serde(rename = "hiddenSubscriberCount", default)]
    pub hidden_subscriber_count: bool,
    #[serde(rename = "videoCount", skip_serializing_if = "Option::is_none")]
    pub video_count: Option<String>,
}
