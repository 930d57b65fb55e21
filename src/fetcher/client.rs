use crate::fetcher::{
    errors::FetchError, guard::HostPolicy, pipeline::decode_body, types::PageResponse,
};
use reqwest::{Client, ClientBuilder, header, redirect};
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const MAX_REDIRECTS: usize = 10;
const USER_AGENT: &str = concat!("media-brief/", env!("CARGO_PKG_VERSION"));

/// Client used for JSON calls to the platform and completion APIs.
///
/// Completion calls on long inputs can take well over a minute, so the total
/// timeout is generous.
pub fn build_api_client() -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .user_agent(USER_AGENT)
        .build()
}

/// Downloads article pages when a URL is submitted as text.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    policy: HostPolicy,
}

impl PageFetcher {
    pub fn new(policy: HostPolicy) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_page_client(policy)?,
            policy,
        })
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = url::Url::parse(url)?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(parsed_url.scheme().to_string()));
        }
        self.policy.check(&parsed_url)?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let url_final = response.url().clone();
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.without_url().to_string()))?;

        // Content-Length may be absent or wrong.
        if body.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body.len() as u64));
        }

        let (body_utf8, encoding) = decode_body(&content_type, &body)?;
        debug!(bytes = body.len(), encoding, final_url = %url_final, "fetched page");

        Ok(PageResponse {
            url_final,
            body_utf8,
            fetched_at: chrono::Utc::now(),
        })
    }
}

/// Every redirect hop goes through the same host policy as the first request.
fn build_page_client(policy: HostPolicy) -> Result<Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );

    let redirects = redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error(FetchError::RedirectLoop);
        }
        match policy.check(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(blocked) => attempt.error(blocked),
        }
    });

    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .redirect(redirects)
        .default_headers(headers)
        .build()
}
