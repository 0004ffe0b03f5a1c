//! Response caching for the service façade.
//!
//! The cache is four independent key-value partitions, one per logical
//! query shape: keyword-search results, channel info, channel-playlist
//! results, and batched video-detail lookups. Keys are derived verbatim
//! from the query (no case folding, no trimming); two requests that would
//! hit the same upstream data produce the same key, and callers are
//! responsible for canonical input.
//!
//! Values are immutable once stored: a `set_*` replaces the entry
//! wholesale, never partially. The reference implementation is
//! [`MemoryCache`]; a remote key-value store can back the same trait as
//! long as it gives the same concurrency guarantees.

pub mod memory;

pub use memory::MemoryCache;

use crate::youtube_api::channels::ChannelInfo;
use crate::youtube_api::videos::VideoResults;

/// The four-partition response cache.
///
/// Implementations must tolerate concurrent `get`/`set` from any number
/// of callers without corrupting internal state. A `get` racing a `set`
/// on the same key may observe the older value; no read-after-write
/// ordering is promised across partitions.
pub trait Cache: Send + Sync {
    /// Looks up cached results for a keyword search.
    fn get_video(&self, key: &str) -> Option<VideoResults>;
    /// Stores results for a keyword search, replacing any previous entry.
    fn set_video(&self, key: &str, video: VideoResults);

    /// Looks up cached channel info.
    fn get_channel(&self, key: &str) -> Option<ChannelInfo>;
    /// Stores channel info, replacing any previous entry.
    fn set_channel(&self, key: &str, channel: ChannelInfo);

    /// Looks up a cached channel-playlist listing.
    ///
    /// The outer `Option` is cache presence; the inner one distinguishes a
    /// real result from the cached "no uploads playlist" marker, which
    /// replays as a failure without another upstream call.
    fn get_playlist(&self, key: &str) -> Option<Option<VideoResults>>;
    /// Stores a playlist listing, or `None` as the explicit
    /// no-result marker.
    fn set_playlist(&self, key: &str, playlist: Option<VideoResults>);

    /// Looks up a cached batched video-detail result.
    fn get_video_detail(&self, key: &str) -> Option<VideoResults>;
    /// Stores a batched video-detail result, replacing any previous entry.
    fn set_video_detail(&self, key: &str, detail: VideoResults);

    /// Identifies the backing store. Diagnostics only; never drives
    /// behavior.
    fn service_name(&self) -> &str;
}
