use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::{MediaMetadata, MetadataError, send_json};
use crate::classifier::Platform;

#[derive(Debug, Deserialize)]
struct Video {
    name: String,
    description: Option<String>,
    #[serde(default)]
    duration: u64,
    user: Option<User>,
    stats: Option<Stats>,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct User {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Stats {
    plays: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

impl From<Video> for MediaMetadata {
    fn from(video: Video) -> Self {
        MediaMetadata {
            title: video.name,
            description: video.description.unwrap_or_default(),
            channel: video.user.map(|u| u.name).unwrap_or_default(),
            // Vimeo reports whole seconds.
            duration: video.duration.to_string(),
            views: video.stats.and_then(|s| s.plays),
            tags: Some(video.tags.into_iter().map(|t| t.name).collect()),
            ..Default::default()
        }
    }
}

#[instrument(skip(http, base_url, access_token))]
pub async fn fetch_video(
    http: &Client,
    base_url: &str,
    access_token: &str,
    video_id: &str,
) -> Result<MediaMetadata, MetadataError> {
    let request = http
        .get(format!("{base_url}/videos/{video_id}"))
        .bearer_auth(access_token);

    let video: Video = send_json(Platform::Vimeo, request).await?;
    Ok(video.into())
}
