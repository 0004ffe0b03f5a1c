//! In-process reference implementation of [`Cache`].

use crate::cache::Cache;
use crate::youtube_api::channels::ChannelInfo;
use crate::youtube_api::videos::VideoResults;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Partitions {
    video: HashMap<String, VideoResults>,
    channel: HashMap<String, ChannelInfo>,
    playlist: HashMap<String, Option<VideoResults>>,
    video_detail: HashMap<String, VideoResults>,
}

/// All four partitions behind one mutex.
///
/// Entries live for the life of the process: no TTL, no eviction, no size
/// bound. Gets hand out clones, so a cached value can never be mutated in
/// place by a caller.
#[derive(Default)]
pub struct MemoryCache {
    inner: Mutex<Partitions>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Partitions> {
        // Writes are plain map inserts, so a panic can't leave a partition
        // half-updated; recover the guard rather than poisoning forever.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Cache for MemoryCache {
    fn get_video(&self, key: &str) -> Option<VideoResults> {
        self.lock().video.get(key).cloned()
    }

    fn set_video(&self, key: &str, video: VideoResults) {
        self.lock().video.insert(key.to_string(), video);
    }

    fn get_channel(&self, key: &str) -> Option<ChannelInfo> {
        self.lock().channel.get(key).cloned()
    }

    fn set_channel(&self, key: &str, channel: ChannelInfo) {
        self.lock().channel.insert(key.to_string(), channel);
    }

    fn get_playlist(&self, key: &str) -> Option<Option<VideoResults>> {
        self.lock().playlist.get(key).cloned()
    }

    fn set_playlist(&self, key: &str, playlist: Option<VideoResults>) {
        self.lock().playlist.insert(key.to_string(), playlist);
    }

    fn get_video_detail(&self, key: &str) -> Option<VideoResults> {
        self.lock().video_detail.get(key).cloned()
    }

    fn set_video_detail(&self, key: &str, detail: VideoResults) {
        self.lock().video_detail.insert(key.to_string(), detail);
    }

    fn service_name(&self) -> &str {
        "memory-cache"
    }
}
