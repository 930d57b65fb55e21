use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{MediaMetadata, MetadataError, send_json};
use crate::classifier::Platform;

const PARTS: &str = "snippet,contentDetails,statistics";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Video {
    snippet: Snippet,
    content_details: ContentDetails,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    tags: Vec<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

impl From<Video> for MediaMetadata {
    fn from(video: Video) -> Self {
        MediaMetadata {
            title: video.snippet.title,
            description: video.snippet.description,
            channel: video.snippet.channel_title,
            duration: video.content_details.duration,
            views: video
                .statistics
                .view_count
                .and_then(|count| count.parse().ok()),
            tags: Some(video.snippet.tags),
            published_at: video.snippet.published_at,
            ..Default::default()
        }
    }
}

/// One call to the Data API covering snippet, content details and statistics.
#[instrument(skip(http, base_url, api_key))]
pub async fn fetch_video(
    http: &Client,
    base_url: &str,
    api_key: &str,
    video_id: &str,
) -> Result<MediaMetadata, MetadataError> {
    let request = http
        .get(format!("{base_url}/youtube/v3/videos"))
        .query(&[("part", PARTS), ("id", video_id), ("key", api_key)]);

    let list: VideoListResponse = send_json(Platform::Youtube, request).await?;
    debug!(items = list.items.len(), "youtube video list");

    list.items
        .into_iter()
        .next()
        .map(MediaMetadata::from)
        .ok_or_else(|| MetadataError::NotFound {
            platform: Platform::Youtube,
            id: video_id.to_string(),
        })
}
