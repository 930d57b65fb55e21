//! Media metadata lookup against the video and podcast host APIs.

pub mod apple;
pub mod errors;
pub mod spotify;
pub mod types;
pub mod vimeo;
pub mod youtube;

pub use errors::MetadataError;
pub use types::MediaMetadata;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::{
    classifier::{Classification, Platform, PlatformId},
    config::{Credentials, UpstreamUrls},
};

/// Anything that can turn a classified media URL into normalized metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, media: &Classification) -> Result<MediaMetadata, MetadataError>;
}

/// Production metadata source talking to the real platform APIs.
#[derive(Clone)]
pub struct MediaClient {
    http: Client,
    credentials: Credentials,
    upstream: UpstreamUrls,
}

impl MediaClient {
    pub fn new(http: Client, credentials: Credentials, upstream: UpstreamUrls) -> Self {
        Self {
            http,
            credentials,
            upstream,
        }
    }
}

#[async_trait]
impl MetadataSource for MediaClient {
    #[instrument(skip_all, fields(platform = ?media.platform))]
    async fn fetch(&self, media: &Classification) -> Result<MediaMetadata, MetadataError> {
        let metadata = match (&media.platform, &media.platform_id) {
            (Platform::Youtube, PlatformId::Single(id)) => {
                let key = required(&self.credentials.youtube_api_key, "YouTube")?;
                youtube::fetch_video(&self.http, &self.upstream.youtube, key, id).await?
            }
            (Platform::Vimeo, PlatformId::Single(id)) => {
                let token = required(&self.credentials.vimeo_access_token, "Vimeo")?;
                vimeo::fetch_video(&self.http, &self.upstream.vimeo, token, id).await?
            }
            (Platform::Spotify, PlatformId::Single(id)) => {
                let client_id = required(&self.credentials.spotify_client_id, "Spotify")?;
                let secret = required(&self.credentials.spotify_client_secret, "Spotify")?;
                let endpoints = spotify::Endpoints {
                    accounts: &self.upstream.spotify_accounts,
                    api: &self.upstream.spotify_api,
                };
                spotify::fetch_episode(&self.http, endpoints, client_id, secret, id).await?
            }
            (Platform::ApplePodcasts, PlatformId::ApplePair { .. }) => apple::placeholder(),
            (platform, _) => return Err(MetadataError::UnsupportedId(*platform)),
        };

        info!(title = %metadata.title, "fetched media metadata");
        Ok(metadata)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, MetadataError> {
    value.as_deref().ok_or(MetadataError::MissingCredential(name))
}

/// Send a request, reject non-2xx responses and decode the JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    platform: Platform,
    request: RequestBuilder,
) -> Result<T, MetadataError> {
    let response = request
        .send()
        .await
        .map_err(|e| MetadataError::from_reqwest_error(platform, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MetadataError::Http { platform, status });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| MetadataError::from_reqwest_error(platform, e))?;

    serde_json::from_slice(&body).map_err(|e| MetadataError::Decode {
        platform,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_without_credentials() -> MediaClient {
        MediaClient::new(Client::new(), Credentials::default(), UpstreamUrls::default())
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_request() {
        let client = client_without_credentials();
        let media = crate::classifier::classify("https://www.youtube.com/watch?v=abc123").unwrap();

        match client.fetch(&media).await {
            Err(MetadataError::MissingCredential(name)) => assert_eq!(name, "YouTube"),
            other => panic!("Expected MissingCredential, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apple_podcasts_needs_no_credentials() {
        let client = client_without_credentials();
        let media = crate::classifier::classify(
            "https://podcasts.apple.com/us/podcast/name/id123456789?i=987654321",
        )
        .unwrap();

        let metadata = client.fetch(&media).await.unwrap();
        assert!(metadata.title.contains("RSS"));
    }

    #[tokio::test]
    async fn test_mismatched_identifier_shape() {
        let client = client_without_credentials();
        let media = Classification {
            kind: crate::classifier::ContentKind::Podcast,
            platform: Platform::ApplePodcasts,
            platform_id: PlatformId::single("123"),
        };

        assert!(matches!(
            client.fetch(&media).await,
            Err(MetadataError::UnsupportedId(Platform::ApplePodcasts))
        ));
    }
}
