//! Caching client for the YouTube Data API v3.
//!
//! The crate exposes four operations through [`YouTubeService`]:
//!
//! - [`search_and_retrieve_tags`](YouTubeService::search_and_retrieve_tags)
//!   — keyword search, enriched with per-video tags and statistics and
//!   filtered to videos with more than
//!   [`MIN_VIEWS`](aggregate::MIN_VIEWS) views;
//! - [`channel_info`](YouTubeService::channel_info) — channel metadata,
//!   including the channel's uploads-playlist reference;
//! - [`channel_playlist`](YouTubeService::channel_playlist) — a channel's
//!   uploaded videos with full details;
//! - [`videos_by_ids`](YouTubeService::videos_by_ids) — detail lookup for
//!   an arbitrary id list, batched 50 ids per request.
//!
//! Every operation caches its assembled result in a pluggable
//! [`Cache`] (in-memory by default) keyed by the logical query, so a
//! repeated query is answered without upstream traffic. Pagination across
//! continuation tokens is handled by
//! [`PagedStream`](youtube_api::PagedStream).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubecache::{MemoryCache, YouTubeService};
//!
//! # async fn example() -> Result<(), tubecache::Error> {
//! let service = YouTubeService::new("api-key", Arc::new(MemoryCache::new()));
//! let results = service.search_and_retrieve_tags("rust async", Some(2)).await?;
//! for video in &results.items {
//!     if let Some(snippet) = &video.snippet {
//!         println!("{:?}: {:?}", snippet.title, snippet.tags);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod service;
pub mod youtube_api;

pub use cache::{Cache, MemoryCache};
pub use error::Error;
pub use service::YouTubeService;
pub use youtube_api::{ChannelInfo, ChannelItem, Video, VideoResults};
