//! YouTube Videos API types and the id batcher.

use crate::youtube_api::types::Thumbnails;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The `videos.list` endpoint rejects requests naming more than this many
/// ids, so larger id sets are split into consecutive batches.
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Splits `ids` into consecutive chunks of at most
/// [`MAX_IDS_PER_REQUEST`], each joined into the comma-separated form the
/// `id` query parameter expects.
///
/// Original order is preserved both across and within chunks, no id is
/// dropped or duplicated, and an empty input produces no chunks.
pub fn batch_ids(ids: &[String]) -> Vec<String> {
    ids.chunks(MAX_IDS_PER_REQUEST)
        .map(|chunk| chunk.join(","))
        .collect()
}

/// A set of video lookup results.
///
/// This doubles as the wire shape of one `videos.list` page and as the
/// accumulated, cacheable result of walking all pages of all batches: the
/// API's page shape is exactly "items plus optional continuation token".
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoResults {
    #[serde(default)]
    pub items: Vec<Video>,
    /// Token that can be used as the `pageToken` parameter to retrieve the
    /// next page in the result set. `None` on an assembled result.
    #[serde(rename = "nextPageToken", skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A `video` resource.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<VideoSnippet>,
    /// Absent on lookup paths that do not request the `statistics` part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<VideoStatistics>,
}

/// Basic details about a video.
///
/// The field projection we request from `videos.list` omits the channel
/// reference and thumbnails; those are filled in afterwards from the
/// search or playlist listing that produced the video id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSnippet {
    #[serde(rename = "channelId", skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(rename = "channelTitle", skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(rename = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    /// Keyword tags associated with the video by its uploader.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Statistics about a video. The API transports every count as a decimal
/// string.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStatistics {
    /// The number of times the video has been viewed.
    #[serde(rename = "viewCount", skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    /// The number of users who have indicated that they liked the video.
    #[serde(rename = "likeCount", skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
    /// Only visible to the video owner.
    #[serde(rename = "dislikeCount", skip_serializing_if = "Option::is_none")]
    pub dislike_count: Option<String>,
    /// Deprecated upstream and always 0, but still transported.
    #[serde(rename = "favoriteCount", skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<String>,
    /// The number of comments for the video.
    #[serde(rename = "commentCount", skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("vid{i}")).collect()
    }

    #[test]
    fn empty_input_yields_no_batches() {
        assert!(batch_ids(&[]).is_empty());
    }

    #[test]
    fn short_input_fits_one_batch() {
        let input = ids(3);
        assert_eq!(batch_ids(&input), vec!["vid0,vid1,vid2".to_string()]);
    }

    #[test]
    fn uneven_input_leaves_short_final_batch() {
        let input = ids(120);
        let batches = batch_ids(&input);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].split(',').count(), 50);
        assert_eq!(batches[1].split(',').count(), 50);
        assert_eq!(batches[2].split(',').count(), 20);
    }

    #[test]
    fn concatenating_batches_reconstructs_input() {
        for len in [1, 49, 50, 51, 100, 137] {
            let input = ids(len);
            let batches = batch_ids(&input);

            assert_eq!(batches.len(), len.div_ceil(MAX_IDS_PER_REQUEST));
            let roundtrip: Vec<String> = batches
                .iter()
                .flat_map(|batch| batch.split(',').map(str::to_string))
                .collect();
            assert_eq!(roundtrip, input, "length {len}");
        }
    }
}
