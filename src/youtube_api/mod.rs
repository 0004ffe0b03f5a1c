//! YouTube Data API v3 client layer.
//!
//! This module owns everything that touches the wire: endpoint URLs, the
//! [`HttpGet`] seam, serde shapes for the four endpoints we consume
//! (search, videos, channels, playlistItems), the [`PagedStream`]
//! continuation-token walker, and the 50-id [`batch_ids`] splitter.
//!
//! Everything above it — caching, merging search snippets into lookup
//! results, view-count filtering — lives in [`crate::service`] and
//! [`crate::aggregate`].

pub mod channels;
pub mod client;
pub mod playlists;
pub mod search;
pub mod types;
pub mod videos;

pub use client::{HttpGet, ReqwestHttp, YouTubeClient};
pub use types::{PageInfo, PagedStream, Thumbnail, Thumbnails};

pub use channels::{ChannelInfo, ChannelItem, RelatedPlaylists};
pub use playlists::{PlaylistItem, PlaylistItemListResponse};
pub use search::{SearchListResponse, SearchResult};
pub use videos::{MAX_IDS_PER_REQUEST, Video, VideoResults, VideoStatistics, batch_ids};
