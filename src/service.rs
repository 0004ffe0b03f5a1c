//! The public façade: four cached operations over the YouTube Data API.
//!
//! Every operation follows the same shape: probe the cache, on a miss walk
//! the upstream endpoint(s), assemble the result, write it back, return
//! it. Within one operation upstream calls are strictly sequential (page
//! k+1 only after page k, batches one at a time); across operations any
//! number of callers may run concurrently against a shared service.

use crate::aggregate::{self, MIN_VIEWS, SnippetSource};
use crate::cache::{Cache, MemoryCache};
use crate::error::Error;
use crate::youtube_api::channels::{ChannelInfo, ChannelItem};
use crate::youtube_api::client::{HttpGet, YouTubeClient};
use crate::youtube_api::types::PagedStream;
use crate::youtube_api::videos::{MAX_IDS_PER_REQUEST, VideoResults, batch_ids};
use std::collections::HashMap;
use std::pin::pin;
use std::sync::{Arc, OnceLock};
use tokio_stream::StreamExt;
use tracing::instrument;

/// Keyword search paginates at most this many pages per call, however
/// many the caller asks for.
const MAX_SEARCH_PAGES: usize = 5;

static GLOBAL_INSTANCE: OnceLock<YouTubeService> = OnceLock::new();

/// Cached client for the four YouTube Data API operations this crate
/// exposes.
///
/// The service owns no state beyond the API key and a handle to its
/// [`Cache`]; a constructed instance is safe to share across concurrent
/// tasks.
pub struct YouTubeService {
    client: YouTubeClient,
    cache: Arc<dyn Cache>,
}

impl std::fmt::Debug for YouTubeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeService")
            .field("cache", &self.cache.service_name())
            .finish_non_exhaustive()
    }
}

impl YouTubeService {
    /// Creates an independent service instance over the given cache.
    pub fn new(api_key: impl Into<String>, cache: Arc<dyn Cache>) -> Self {
        Self::with_client(YouTubeClient::new(api_key), cache)
    }

    /// Like [`YouTubeService::new`], but with an explicit [`HttpGet`]
    /// implementation behind the client. This is the constructor tests
    /// use to substitute a fake upstream.
    pub fn with_http(
        api_key: impl Into<String>,
        cache: Arc<dyn Cache>,
        http: Arc<dyn HttpGet>,
    ) -> Self {
        Self::with_client(YouTubeClient::with_http(api_key, http), cache)
    }

    fn with_client(client: YouTubeClient, cache: Arc<dyn Cache>) -> Self {
        tracing::debug!(cache = cache.service_name(), "constructed YouTube service");
        Self { client, cache }
    }

    /// Returns the process-wide shared instance, constructing it over a
    /// fresh [`MemoryCache`] on first call.
    ///
    /// Only the first call's `api_key` is used; later calls get the
    /// already-built instance regardless of their argument. Independent
    /// instances via [`YouTubeService::new`] remain available alongside
    /// the global one.
    pub fn global(api_key: &str) -> &'static YouTubeService {
        GLOBAL_INSTANCE.get_or_init(|| Self::new(api_key, Arc::new(MemoryCache::new())))
    }

    /// The API key this service passes through to the upstream API.
    pub fn api_key(&self) -> &str {
        self.client.api_key()
    }

    /// Searches videos by keyword and enriches the hits with tags and
    /// statistics, keeping only videos with more than
    /// [`MIN_VIEWS`] views.
    ///
    /// `pages` is clamped to 1..=5 search pages (default 1).
    ///
    /// Results are cached under the raw query string alone. `pages` is
    /// deliberately not part of the key, mirroring long-standing caller
    /// expectations: a repeat query with a different page count returns
    /// the previously cached result as-is. Callers that need a deeper
    /// walk of an already-queried term must use a fresh cache.
    #[instrument(skip(self))]
    pub async fn search_and_retrieve_tags(
        &self,
        query: &str,
        pages: Option<usize>,
    ) -> Result<VideoResults, Error> {
        if let Some(hit) = self.cache.get_video(query) {
            tracing::debug!(%query, "search cache hit");
            return Ok(hit);
        }
        let pages = pages.unwrap_or(1).clamp(1, MAX_SEARCH_PAGES);

        let mut ids = Vec::new();
        let mut sources: HashMap<String, SnippetSource> = HashMap::new();
        {
            let stream = PagedStream::bounded(
                |token| async move {
                    let page = self.client.search_page(query, token).await?;
                    Ok((page.items, page.next_page_token))
                },
                pages,
            );
            let mut stream = pin!(stream);
            while let Some(result) = stream.next().await {
                let result = result?;
                let snippet = result.snippet.unwrap_or_default();
                ids.push(result.id.video_id.clone());
                sources.insert(
                    result.id.video_id,
                    SnippetSource {
                        channel_title: snippet.channel_title,
                        channel_id: snippet.channel_id,
                        thumbnails: snippet.thumbnails,
                    },
                );
            }
        }
        tracing::debug!(%query, hits = ids.len(), "collected search ids");

        let mut results = self.videos_by_ids(&ids).await?;
        aggregate::merge_snippets(&mut results.items, &sources);
        results.items = aggregate::filter_by_views(results.items, MIN_VIEWS)?;

        self.cache.set_video(query, results.clone());
        Ok(results)
    }

    /// Fetches metadata for a single channel, cached under the channel id.
    ///
    /// A well-formed response with zero items is [`Error::NotFound`]; that
    /// outcome is not cached, so a later call asks upstream again.
    #[instrument(skip(self))]
    pub async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, Error> {
        if let Some(hit) = self.cache.get_channel(channel_id) {
            tracing::debug!(%channel_id, "channel cache hit");
            return Ok(hit);
        }

        let info = self.client.channel_info(channel_id).await?;
        if info.items.is_empty() {
            return Err(Error::NotFound(format!(
                "no channel found for id {channel_id}"
            )));
        }

        self.cache.set_channel(channel_id, info.clone());
        Ok(info)
    }

    /// Lists roughly `desired_count` of a channel's uploaded videos with
    /// full details, thumbnails restored from the playlist listing. No
    /// view-count filter is applied on this path.
    ///
    /// The channel item must carry its uploads playlist reference
    /// (see [`ChannelItem::uploads_playlist`]); results are cached under
    /// `<uploads playlist id>-<desired_count>`. A channel without an
    /// uploads playlist gets an explicit no-result marker cached under
    /// `<channel item id>-<desired_count>`, so the failure replays from
    /// cache without another upstream call.
    #[instrument(skip(self, item), fields(channel = %item.id))]
    pub async fn channel_playlist(
        &self,
        item: &ChannelItem,
        desired_count: usize,
    ) -> Result<VideoResults, Error> {
        let uploads = item.uploads_playlist();
        let cache_key = match uploads {
            Some(playlist_id) => format!("{playlist_id}-{desired_count}"),
            None => format!("{}-{desired_count}", item.id),
        };
        if let Some(entry) = self.cache.get_playlist(&cache_key) {
            tracing::debug!(%cache_key, "playlist cache hit");
            return match entry {
                Some(results) => Ok(results),
                None => Err(no_uploads_error(item)),
            };
        }

        let Some(playlist_id) = uploads else {
            self.cache.set_playlist(&cache_key, None);
            return Err(no_uploads_error(item));
        };

        let results = self.fetch_uploads(playlist_id, desired_count).await?;
        self.cache.set_playlist(&cache_key, Some(results.clone()));
        Ok(results)
    }

    async fn fetch_uploads(
        &self,
        playlist_id: &str,
        desired_count: usize,
    ) -> Result<VideoResults, Error> {
        let pages = desired_count.div_ceil(MAX_IDS_PER_REQUEST);

        let mut ids = Vec::new();
        let mut sources: HashMap<String, SnippetSource> = HashMap::new();
        {
            let stream = PagedStream::bounded(
                |token| async move {
                    let page = self.client.playlist_page(playlist_id, token).await?;
                    Ok((page.items, page.next_page_token))
                },
                pages,
            );
            let mut stream = pin!(stream);
            while let Some(entry) = stream.next().await {
                let entry = entry?;
                let video_id = entry.content_details.video_id;
                let thumbnails = entry
                    .snippet
                    .map(|snippet| snippet.thumbnails)
                    .unwrap_or_default();
                ids.push(video_id.clone());
                sources.insert(
                    video_id,
                    SnippetSource {
                        thumbnails,
                        ..Default::default()
                    },
                );
            }
        }
        tracing::debug!(%playlist_id, entries = ids.len(), "collected playlist ids");

        let mut results = self.videos_by_ids(&ids).await?;
        aggregate::merge_snippets(&mut results.items, &sources);
        Ok(results)
    }

    /// Looks up full details for an arbitrary id list, batching 50 ids per
    /// request and draining each batch's continuation tokens.
    ///
    /// Items arrive in batch order, and within each batch in upstream
    /// page order. The result is cached under the comma-joined id list
    /// exactly as given; callers wanting order-insensitive reuse must
    /// canonicalize the list themselves.
    #[instrument(skip(self, ids), fields(id_count = ids.len()))]
    pub async fn videos_by_ids(&self, ids: &[String]) -> Result<VideoResults, Error> {
        let key = ids.join(",");
        if let Some(hit) = self.cache.get_video_detail(&key) {
            tracing::debug!(ids = ids.len(), "video-detail cache hit");
            return Ok(hit);
        }

        let mut assembled = VideoResults::default();
        for batch in batch_ids(ids) {
            let batch = batch.as_str();
            let stream = PagedStream::new(|token| async move {
                let page = self.client.videos_page(batch, token).await?;
                Ok((page.items, page.next_page_token))
            });
            let mut stream = pin!(stream);
            while let Some(video) = stream.next().await {
                assembled.items.push(video?);
            }
        }

        self.cache.set_video_detail(&key, assembled.clone());
        Ok(assembled)
    }
}

fn no_uploads_error(item: &ChannelItem) -> Error {
    Error::NotFound(format!("channel {} has no uploads playlist", item.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube_api::channels::{ChannelContentDetails, RelatedPlaylists};
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&str) -> Result<String, Error> + Send + Sync>;

    /// Canned upstream: routes on the request URL, records every call.
    struct FakeHttp {
        calls: Mutex<Vec<String>>,
        respond: Responder,
    }

    impl FakeHttp {
        fn new(respond: impl Fn(&str) -> Result<String, Error> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpGet for FakeHttp {
        async fn get(&self, url: &str) -> Result<Bytes, Error> {
            self.calls.lock().unwrap().push(url.to_string());
            (self.respond)(url).map(Bytes::from)
        }
    }

    fn param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
        url.split(['?', '&'])
            .find_map(|pair| pair.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')))
    }

    fn search_item(id: &str, channel_title: &str) -> Value {
        json!({
            "id": { "videoId": id },
            "snippet": {
                "title": format!("video {id}"),
                "channelTitle": channel_title,
                "channelId": format!("UC-{channel_title}"),
                "thumbnails": {
                    "default": { "url": format!("https://i.ytimg.com/{id}.jpg"), "width": 120, "height": 90 }
                }
            }
        })
    }

    fn video_item(id: &str, views: &str) -> Value {
        json!({
            "id": id,
            "snippet": { "title": format!("video {id}"), "tags": ["tag1", "tag2"] },
            "statistics": { "viewCount": views }
        })
    }

    fn playlist_entry(video_id: &str) -> Value {
        json!({
            "id": format!("pl-{video_id}"),
            "snippet": {
                "title": format!("video {video_id}"),
                "thumbnails": {
                    "default": { "url": format!("https://i.ytimg.com/{video_id}.jpg"), "width": 120, "height": 90 }
                }
            },
            "contentDetails": { "videoId": video_id }
        })
    }

    fn channel_item_with_uploads(uploads: &str) -> ChannelItem {
        ChannelItem {
            id: "UC123".to_string(),
            snippet: None,
            content_details: Some(ChannelContentDetails {
                related_playlists: Some(RelatedPlaylists {
                    likes: None,
                    uploads: Some(uploads.to_string()),
                }),
            }),
            statistics: None,
        }
    }

    fn service_with(http: &Arc<FakeHttp>) -> (YouTubeService, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        let service = YouTubeService::with_http(
            "test-key",
            Arc::clone(&cache) as Arc<dyn Cache>,
            Arc::clone(http) as Arc<dyn HttpGet>,
        );
        (service, cache)
    }

    /// The §8-style end-to-end scenario: two search pages, five ids, view
    /// counts [2000, 500, 3000, 1200, 900], minimum 1000.
    fn alai_upstream() -> Arc<FakeHttp> {
        FakeHttp::new(|url| {
            let body = if url.contains("/search") {
                assert_eq!(param(url, "q"), Some("alai"));
                match param(url, "pageToken") {
                    None => json!({
                        "items": [
                            search_item("v1", "Alpha"),
                            search_item("v2", "Alpha"),
                            search_item("v3", "Beta"),
                        ],
                        "nextPageToken": "p2"
                    }),
                    Some("p2") => json!({
                        "items": [search_item("v4", "Gamma"), search_item("v5", "Gamma")]
                    }),
                    Some(other) => panic!("unexpected page token {other:?}"),
                }
            } else if url.contains("/videos") {
                assert_eq!(param(url, "id"), Some("v1,v2,v3,v4,v5"));
                json!({
                    "items": [
                        video_item("v1", "2000"),
                        video_item("v2", "500"),
                        video_item("v3", "3000"),
                        video_item("v4", "1200"),
                        video_item("v5", "900"),
                    ]
                })
            } else {
                panic!("unexpected url {url}");
            };
            Ok(body.to_string())
        })
    }

    #[tokio::test]
    async fn search_merges_filters_and_caches_by_query_only() {
        let http = alai_upstream();
        let (service, cache) = service_with(&http);

        let results = service
            .search_and_retrieve_tags("alai", Some(2))
            .await
            .unwrap();

        let ids: Vec<&str> = results.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v1", "v3", "v4"]);
        // 2 search pages + 1 batched lookup
        assert_eq!(http.call_count(), 3);

        // channel/thumbnail metadata from the listing survived the lookup
        let first = results.items[0].snippet.as_ref().unwrap();
        assert_eq!(first.channel_title.as_deref(), Some("Alpha"));
        assert_eq!(first.channel_id.as_deref(), Some("UC-Alpha"));
        assert!(first.thumbnails.default.is_some());
        assert_eq!(first.tags, ["tag1", "tag2"]);

        assert!(cache.get_video("alai").is_some());

        // A different page count hits the same key and returns the stale
        // cached value without touching upstream.
        let again = service
            .search_and_retrieve_tags("alai", Some(5))
            .await
            .unwrap();
        assert_eq!(again, results);
        assert_eq!(http.call_count(), 3);
    }

    #[tokio::test]
    async fn search_page_count_is_clamped_to_five() {
        let http = FakeHttp::new(|url| {
            let body = if url.contains("/search") {
                let page = param(url, "pageToken").unwrap_or("p1").to_string();
                let next = format!("p{}", page[1..].parse::<usize>().unwrap() + 1);
                json!({ "items": [search_item(&page, "Chan")], "nextPageToken": next })
            } else {
                json!({ "items": [] })
            };
            Ok(body.to_string())
        });
        let (service, _) = service_with(&http);

        service
            .search_and_retrieve_tags("endless", Some(50))
            .await
            .unwrap();

        let search_calls = http
            .calls()
            .iter()
            .filter(|url| url.contains("/search"))
            .count();
        assert_eq!(search_calls, 5);
    }

    #[tokio::test]
    async fn search_aborts_on_malformed_view_count_and_caches_nothing() {
        let http = FakeHttp::new(|url| {
            let body = if url.contains("/search") {
                json!({ "items": [search_item("v1", "Alpha")] })
            } else {
                json!({ "items": [video_item("v1", "abc")] })
            };
            Ok(body.to_string())
        });
        let (service, cache) = service_with(&http);

        let err = service
            .search_and_retrieve_tags("bad", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DataIntegrity { .. }));
        assert!(cache.get_video("bad").is_none());
    }

    #[tokio::test]
    async fn search_propagates_decode_errors() {
        let http = FakeHttp::new(|_| Ok("this is not json".to_string()));
        let (service, cache) = service_with(&http);

        let err = service
            .search_and_retrieve_tags("broken", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(cache.get_video("broken").is_none());
    }

    #[tokio::test]
    async fn videos_by_ids_batches_pages_and_caches() {
        // 60 ids: first batch of 50 answers in two pages, second batch of
        // 10 in one.
        let all_ids: Vec<String> = (0..60).map(|i| format!("vid{i:02}")).collect();
        let http = FakeHttp::new(|url| {
            assert!(url.contains("/videos"), "unexpected url {url}");
            let batch: Vec<&str> = param(url, "id").unwrap().split(',').collect();
            let body = match (batch.len(), param(url, "pageToken")) {
                (50, None) => json!({
                    "items": batch[..30].iter().map(|id| video_item(id, "1")).collect::<Vec<_>>(),
                    "nextPageToken": "rest"
                }),
                (50, Some("rest")) => json!({
                    "items": batch[30..].iter().map(|id| video_item(id, "1")).collect::<Vec<_>>(),
                }),
                (10, None) => json!({
                    "items": batch.iter().map(|id| video_item(id, "1")).collect::<Vec<_>>(),
                }),
                other => panic!("unexpected request shape {other:?}"),
            };
            Ok(body.to_string())
        });
        let (service, _) = service_with(&http);

        let results = service.videos_by_ids(&all_ids).await.unwrap();

        let ids: Vec<String> = results.items.iter().map(|v| v.id.clone()).collect();
        assert_eq!(ids, all_ids);
        assert_eq!(http.call_count(), 3);

        // second identical request is served from cache
        let again = service.videos_by_ids(&all_ids).await.unwrap();
        assert_eq!(again, results);
        assert_eq!(http.call_count(), 3);
    }

    #[tokio::test]
    async fn empty_id_list_makes_no_upstream_calls() {
        let http = FakeHttp::new(|url| panic!("unexpected call to {url}"));
        let (service, _) = service_with(&http);

        let results = service.videos_by_ids(&[]).await.unwrap();
        assert!(results.items.is_empty());
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn channel_info_caches_and_short_circuits() {
        let http = FakeHttp::new(|url| {
            assert!(url.contains("/channels"));
            assert_eq!(param(url, "id"), Some("UC123"));
            Ok(json!({
                "items": [{
                    "id": "UC123",
                    "snippet": { "title": "Some Channel" },
                    "contentDetails": { "relatedPlaylists": { "uploads": "UU123" } },
                    "statistics": { "videoCount": "321" }
                }]
            })
            .to_string())
        });
        let (service, _) = service_with(&http);

        let info = service.channel_info("UC123").await.unwrap();
        assert_eq!(info.items[0].uploads_playlist(), Some("UU123"));
        assert_eq!(info.items[0].video_count().unwrap(), 321);

        let again = service.channel_info("UC123").await.unwrap();
        assert_eq!(again, info);
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn channel_info_empty_listing_is_not_found_and_not_cached() {
        let http = FakeHttp::new(|_| Ok(json!({ "items": [] }).to_string()));
        let (service, _) = service_with(&http);

        for _ in 0..2 {
            let err = service.channel_info("UCmissing").await.unwrap_err();
            assert!(matches!(err, Error::NotFound(_)));
        }
        // the failure was not cached, so upstream was asked twice
        assert_eq!(http.call_count(), 2);
    }

    #[tokio::test]
    async fn channel_playlist_merges_thumbnails_without_view_filter() {
        let http = FakeHttp::new(|url| {
            let body = if url.contains("/playlistItems") {
                assert_eq!(param(url, "playlistId"), Some("UU123"));
                match param(url, "pageToken") {
                    None => json!({
                        "items": [playlist_entry("u1"), playlist_entry("u2")],
                        "nextPageToken": "p2"
                    }),
                    Some("p2") => json!({
                        "items": [playlist_entry("u3")],
                        "nextPageToken": "p3"
                    }),
                    Some(other) => panic!("unexpected page token {other:?}"),
                }
            } else if url.contains("/videos") {
                assert_eq!(param(url, "id"), Some("u1,u2,u3"));
                json!({
                    "items": [
                        video_item("u1", "5"),
                        video_item("u2", "0"),
                        video_item("u3", "999999"),
                    ]
                })
            } else {
                panic!("unexpected url {url}");
            };
            Ok(body.to_string())
        });
        let (service, cache) = service_with(&http);
        let channel = channel_item_with_uploads("UU123");

        // 75 desired -> two playlist pages, even though a third exists
        let results = service.channel_playlist(&channel, 75).await.unwrap();

        let ids: Vec<&str> = results.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u2", "u3"], "no view filter on this path");
        assert_eq!(
            results.items[0]
                .snippet
                .as_ref()
                .unwrap()
                .thumbnails
                .default
                .as_ref()
                .unwrap()
                .url,
            "https://i.ytimg.com/u1.jpg"
        );
        assert!(cache.get_playlist("UU123-75").is_some());

        let calls_before = http.call_count();
        let again = service.channel_playlist(&channel, 75).await.unwrap();
        assert_eq!(again, results);
        assert_eq!(http.call_count(), calls_before);
    }

    #[tokio::test]
    async fn channel_playlist_missing_uploads_caches_failure_marker() {
        let http = FakeHttp::new(|url| panic!("unexpected call to {url}"));
        let (service, cache) = service_with(&http);
        let channel = ChannelItem {
            id: "UCbare".to_string(),
            snippet: None,
            content_details: None,
            statistics: None,
        };

        let err = service.channel_playlist(&channel, 10).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(cache.get_playlist("UCbare-10"), Some(None));

        // the marker replays the failure without upstream traffic
        let err = service.channel_playlist(&channel, 10).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn global_instance_is_constructed_once() {
        let first = YouTubeService::global("key-a");
        let second = YouTubeService::global("key-b");
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.api_key(), "key-a");
    }
}
