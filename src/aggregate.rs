//! Joining listing metadata onto lookup results, and view-count filtering.
//!
//! The `videos.list` projection we request returns statistics but not the
//! channel reference or thumbnails; those ride along on the search or
//! playlist listing that produced the video ids in the first place. This
//! module carries them across the two calls.

use crate::error::Error;
use crate::youtube_api::types::Thumbnails;
use crate::youtube_api::videos::Video;
use std::collections::HashMap;

/// Minimum view count a video must strictly exceed to survive the
/// keyword-search filter.
pub const MIN_VIEWS: u64 = 1000;

/// Per-video metadata captured while walking a search or playlist
/// listing, keyed by video id for the later merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetSource {
    pub channel_title: Option<String>,
    pub channel_id: Option<String>,
    pub thumbnails: Thumbnails,
}

/// Overwrites each video's channel title, channel id, and thumbnails with
/// the listing-sourced values in `sources`, keyed by video id.
///
/// Videos without an entry in `sources` pass through untouched. Videos
/// with an entry but no snippet get one, so the listing metadata is never
/// silently dropped.
pub fn merge_snippets(videos: &mut [Video], sources: &HashMap<String, SnippetSource>) {
    for video in videos {
        let Some(source) = sources.get(&video.id) else {
            continue;
        };
        let snippet = video.snippet.get_or_insert_with(Default::default);
        snippet.channel_title = source.channel_title.clone();
        snippet.channel_id = source.channel_id.clone();
        snippet.thumbnails = source.thumbnails.clone();
    }
}

/// Retains only videos whose view count strictly exceeds `min_views`,
/// preserving relative order.
///
/// A missing, empty, or non-numeric view count fails the whole call with
/// [`Error::DataIntegrity`] instead of skipping the item. The statistics
/// part always carries a well-formed count for the videos we look up, so
/// a malformed one means the response as a whole is suspect.
pub fn filter_by_views(videos: Vec<Video>, min_views: u64) -> Result<Vec<Video>, Error> {
    let mut kept = Vec::with_capacity(videos.len());
    for video in videos {
        let raw = video
            .statistics
            .as_ref()
            .and_then(|statistics| statistics.view_count.as_deref())
            .unwrap_or("");
        let views: u64 = raw.parse().map_err(|_| Error::DataIntegrity {
            field: "statistics.viewCount",
            value: raw.to_string(),
        })?;
        if views > min_views {
            kept.push(video);
        }
    }
    Ok(kept)
}
