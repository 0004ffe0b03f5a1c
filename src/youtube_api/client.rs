//! The HTTP seam and per-endpoint page fetchers for the YouTube Data API.

use crate::error::Error;
use crate::youtube_api::channels::ChannelInfo;
use crate::youtube_api::playlists::PlaylistItemListResponse;
use crate::youtube_api::search::SearchListResponse;
use crate::youtube_api::videos::VideoResults;
use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// The raw HTTP-GET collaborator the client is built on.
///
/// Production code uses the [`ReqwestHttp`] implementation; tests substitute
/// a fake that serves canned response bodies and counts calls.
#[async_trait]
pub trait HttpGet: Send + Sync {
    /// Fetches `url` and returns the response body.
    ///
    /// A network failure or a non-success status is an
    /// [`Error::Transport`].
    async fn get(&self, url: &str) -> Result<Bytes, Error>;
}

/// [`HttpGet`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Default)]
pub struct ReqwestHttp {
    client: reqwest::Client,
}

#[async_trait]
impl HttpGet for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<Bytes, Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

/// Client for the four YouTube Data API v3 endpoints this crate consumes.
///
/// Each method performs exactly one GET round-trip for one page of one
/// endpoint and decodes the JSON body; pagination across pages and
/// batching across id chunks live above this layer, in
/// [`PagedStream`](crate::youtube_api::types::PagedStream) and the
/// service façade.
#[derive(Clone)]
pub struct YouTubeClient {
    api_key: String,
    http: Arc<dyn HttpGet>,
}

impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The api key stays out of Debug output (and therefore out of
        // tracing spans).
        f.debug_struct("YouTubeClient").finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Creates a client that talks to the real API over [`ReqwestHttp`].
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http(api_key, Arc::new(ReqwestHttp::default()))
    }

    /// Creates a client over an explicit [`HttpGet`] implementation.
    pub fn with_http(api_key: impl Into<String>, http: Arc<dyn HttpGet>) -> Self {
        Self {
            api_key: api_key.into(),
            http,
        }
    }

    /// The API key passed through on every request.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let body = self.http.get(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches one page of keyword search results, newest first.
    #[instrument(skip(self, query))]
    pub async fn search_page(
        &self,
        query: &str,
        page_token: Option<String>,
    ) -> Result<SearchListResponse, Error> {
        let q: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let mut url = format!(
            "{API_BASE}/search?part=snippet&maxResults=100&q={q}&type=video&order=date&key={}",
            self.api_key,
        );
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&token);
        }
        self.fetch(&url).await
    }

    /// Fetches one page of video details for a comma-joined id batch of at
    /// most [`MAX_IDS_PER_REQUEST`](crate::youtube_api::videos::MAX_IDS_PER_REQUEST)
    /// ids.
    ///
    /// The field projection deliberately omits the snippet's channel
    /// reference and thumbnails; the caller restores those from the
    /// listing that produced the ids.
    #[instrument(skip(self, id_batch))]
    pub async fn videos_page(
        &self,
        id_batch: &str,
        page_token: Option<String>,
    ) -> Result<VideoResults, Error> {
        let mut url = format!(
            "{API_BASE}/videos?key={}&fields=items(id,snippet(title,publishedAt,description,tags),statistics),nextPageToken&part=snippet,statistics&id={id_batch}",
            self.api_key,
        );
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&token);
        }
        self.fetch(&url).await
    }

    /// Fetches channel metadata for a single channel id. Not paginated.
    #[instrument(skip(self))]
    pub async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, Error> {
        let url = format!(
            "{API_BASE}/channels?part=snippet,contentDetails,statistics&id={channel_id}&maxResults=50&key={}",
            self.api_key,
        );
        self.fetch(&url).await
    }

    /// Fetches one page (up to 50 entries) of a playlist's contents.
    #[instrument(skip(self))]
    pub async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<PlaylistItemListResponse, Error> {
        let mut url = format!(
            "{API_BASE}/playlistItems?part=snippet,contentDetails&maxResults=50&playlistId={playlist_id}&key={}",
            self.api_key,
        );
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&token);
        }
        self.fetch(&url).await
    }
}
