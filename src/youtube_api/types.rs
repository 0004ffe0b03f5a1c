//! Shared types and the pagination engine for the YouTube API client.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

type OneFuturePage<'a, F, T> =
    Pin<Box<dyn Future<Output = Result<(F, (Vec<T>, Option<String>)), Error>> + 'a + Send>>;

/// A paginated stream that walks a YouTube list endpoint page by page.
///
/// The stream yields items one at a time, fetching the next page only once
/// the current page is drained, so page k+1 is never requested before page
/// k's response has been consumed. Items are yielded in page order, and
/// within each page in the order the API returned them; the stream never
/// reorders.
///
/// A fetch error is yielded once and terminates the stream, so a caller
/// that collects the stream into a `Result` gets all-or-nothing semantics
/// for the whole walk. Only forward pagination is supported.
pub struct PagedStream<'a, T, F> {
    /// Current batch of items from the most recent API response
    current_items: VecDeque<T>,
    /// Future representing the currently pending page request, if any
    pending_request: Option<OneFuturePage<'a, F, T>>,
    /// Pages fetched so far, compared against `max_pages`
    pages_fetched: usize,
    /// Stop fetching after this many pages even if more tokens remain
    max_pages: Option<usize>,
    /// Whether we've reached the end of all available data
    is_done: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    /// Create a stream that follows continuation tokens until the endpoint
    /// stops returning one.
    pub fn new<Fut>(fetcher: F) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<(Vec<T>, Option<String>), Error>> + Send + 'a,
    {
        Self::build(fetcher, None)
    }

    /// Create a stream that additionally stops after `max_pages` pages,
    /// even when the endpoint still offers a continuation token.
    ///
    /// `max_pages == 0` yields an empty stream without contacting the
    /// endpoint at all.
    pub fn bounded<Fut>(fetcher: F, max_pages: usize) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<(Vec<T>, Option<String>), Error>> + Send + 'a,
    {
        Self::build(fetcher, Some(max_pages))
    }

    fn build<Fut>(fetcher: F, max_pages: Option<usize>) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = Result<(Vec<T>, Option<String>), Error>> + Send + 'a,
    {
        if max_pages == Some(0) {
            return Self {
                current_items: VecDeque::new(),
                pending_request: None,
                pages_fetched: 0,
                max_pages,
                is_done: true,
            };
        }
        let first_page = async move {
            let results = fetcher(None).await?;
            Ok((fetcher, results))
        };
        Self {
            current_items: VecDeque::new(),
            pending_request: Some(Box::pin(first_page)),
            pages_fetched: 0,
            max_pages,
            is_done: false,
        }
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), Error>> + Send + 'a,
{
    type Item = Result<T, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            // If we have items in the current batch, return the next one
            if let Some(item) = self.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            // If we're done (no more pages), return None
            if self.is_done {
                return Poll::Ready(None);
            }

            // If we have a pending request, poll it
            if let Some(pending) = self.pending_request.as_mut() {
                match pending.as_mut().poll(cx) {
                    Poll::Ready(Ok((fetcher, (items, next_token)))) => {
                        self.current_items.extend(items);
                        self.pages_fetched += 1;

                        let page_budget_left = match self.max_pages {
                            Some(max) => self.pages_fetched < max,
                            None => true,
                        };
                        // An absent or empty token both mean the endpoint
                        // has nothing further.
                        let next_token = next_token.filter(|t| !t.is_empty());

                        match next_token {
                            Some(next_token) if page_budget_left => {
                                // Set up the future for the next page
                                // (but don't poll it yet)
                                self.pending_request = Some(Box::pin(async move {
                                    let results = fetcher(Some(next_token)).await?;
                                    Ok((fetcher, results))
                                }));
                            }
                            _ => {
                                self.is_done = true;
                                self.pending_request = None;
                            }
                        }

                        // Continue the loop to try yielding an item
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        // Error fetching next page
                        self.pending_request = None;
                        self.is_done = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => {
                        // Still waiting for the response
                        return Poll::Pending;
                    }
                }
            } else {
                // No pending request and no next page token means we're done
                self.is_done = true;
                return Poll::Ready(None);
            }
        }
    }
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(rename = "totalResults")]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
}

/// Thumbnail images associated with a video or channel, in the size
/// variants the API serves.
///
/// See: <https://developers.google.com/youtube/v3/docs/thumbnails>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
}

/// A single thumbnail image: its URL and pixel dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}
