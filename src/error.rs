//! Error types shared across the crate.

/// Errors produced while talking to the YouTube Data API or assembling
/// results from it.
///
/// All variants propagate immediately to the caller; there is no retry and
/// no partial-result fallback. Nothing is written to the success-path
/// caches when an operation fails, with the single exception of the
/// "no uploads playlist" marker (see
/// [`YouTubeService::channel_playlist`](crate::service::YouTubeService::channel_playlist)).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP round-trip itself failed, or the API answered with a
    /// non-success status code.
    #[error("upstream request failed")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON shape we asked for.
    #[error("failed to decode upstream response")]
    Decode(#[from] serde_json::Error),

    /// A lookup completed but matched nothing (empty channel listing, or a
    /// channel without an uploads playlist).
    #[error("{0}")]
    NotFound(String),

    /// A numeric statistics field the API transports as a decimal string
    /// did not parse. This aborts the whole operation rather than skipping
    /// the offending item; the API contract says these fields are always
    /// well-formed, so a bad value means the response cannot be trusted.
    #[error("malformed {field} value {value:?}")]
    DataIntegrity {
        field: &'static str,
        value: String,
    },
}
