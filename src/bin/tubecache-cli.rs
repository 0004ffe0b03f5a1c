use std::io::IsTerminal;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tubecache::{MemoryCache, YouTubeService};

#[tokio::main]
async fn main() -> Result<(), tubecache::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let api_key = std::env::var("YOUTUBE_API_KEY").expect("YOUTUBE_API_KEY must be set");
    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_else(|| "rust programming".to_string());
    let pages = args.next().and_then(|raw| raw.parse().ok());

    let service = YouTubeService::new(api_key, Arc::new(MemoryCache::new()));

    let results = service.search_and_retrieve_tags(&query, pages).await?;
    eprintln!("==> {} videos for {query:?}", results.items.len());
    for video in &results.items {
        let title = video
            .snippet
            .as_ref()
            .and_then(|snippet| snippet.title.as_deref())
            .unwrap_or("<untitled>");
        let channel = video
            .snippet
            .as_ref()
            .and_then(|snippet| snippet.channel_title.as_deref())
            .unwrap_or("<unknown channel>");
        let views = video
            .statistics
            .as_ref()
            .and_then(|statistics| statistics.view_count.as_deref())
            .unwrap_or("N/A");
        eprintln!("{:>12} views  {title}  ({channel})", views);
        if let Some(snippet) = &video.snippet {
            if !snippet.tags.is_empty() {
                eprintln!("{:>12}  tags: {}", "", snippet.tags.join(", "));
            }
        }
    }

    // Exercise the cache: the repeat query must not hit the API again.
    let cached = service.search_and_retrieve_tags(&query, pages).await?;
    tracing::info!(items = cached.items.len(), "repeat query served from cache");

    Ok(())
}
