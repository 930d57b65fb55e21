//! Spotify episode lookup.
//!
//! Every lookup first exchanges the client credentials for a bearer token and
//! then requests the episode. The token is dropped when the lookup returns.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{MediaMetadata, MetadataError, send_json, types::format_millis};
use crate::classifier::Platform;

#[derive(Debug, Clone, Copy)]
pub struct Endpoints<'a> {
    pub accounts: &'a str,
    pub api: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Episode {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration_ms: u64,
    release_date: Option<String>,
    episode_number: Option<u32>,
    show: Show,
}

#[derive(Debug, Deserialize)]
struct Show {
    name: String,
    description: Option<String>,
}

impl From<Episode> for MediaMetadata {
    fn from(episode: Episode) -> Self {
        MediaMetadata {
            title: episode.name,
            description: episode.description,
            channel: episode.show.name,
            duration: format_millis(episode.duration_ms),
            published_at: episode.release_date,
            episode_number: episode.episode_number,
            show_description: episode.show.description,
            ..Default::default()
        }
    }
}

#[instrument(skip(http, endpoints, client_id, client_secret))]
pub async fn fetch_episode(
    http: &Client,
    endpoints: Endpoints<'_>,
    client_id: &str,
    client_secret: &str,
    episode_id: &str,
) -> Result<MediaMetadata, MetadataError> {
    let token = access_token(http, endpoints.accounts, client_id, client_secret).await?;
    debug!("obtained spotify access token");

    let request = http
        .get(format!("{}/v1/episodes/{episode_id}", endpoints.api))
        .bearer_auth(&token);

    let episode: Episode = send_json(Platform::Spotify, request).await?;
    Ok(episode.into())
}

async fn access_token(
    http: &Client,
    accounts_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, MetadataError> {
    let request = http
        .post(format!("{accounts_url}/api/token"))
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")]);

    let token: TokenResponse = send_json(Platform::Spotify, request).await?;
    Ok(token.access_token)
}
