//! Loading article text when the submitted "text" is really a URL.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    extractor::{self, ExtractedArticle},
    fetcher::{FetchError, PageFetcher},
};

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no readable article content found")]
    NoContent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<ExtractedArticle, ArticleError>;
}

/// Downloads the page and runs it through the readability extractor.
#[derive(Clone)]
pub struct WebArticleLoader {
    pages: PageFetcher,
}

impl WebArticleLoader {
    pub fn new(pages: PageFetcher) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl ArticleLoader for WebArticleLoader {
    async fn load(&self, url: &str) -> Result<ExtractedArticle, ArticleError> {
        let page = self.pages.fetch(url).await?;
        extractor::extract(&page).ok_or(ArticleError::NoContent)
    }
}

/// Where the text handed to the model came from.
#[derive(Debug, Clone)]
pub enum ArticleSource {
    /// The input was a URL and its page was downloaded and extracted.
    Fetched(ExtractedArticle),
    /// The input is analyzed as written. This covers plain text, and URLs
    /// whose download or extraction failed.
    Literal(String),
}

/// Whether the whole input is a single http(s) URL.
pub fn as_web_url(input: &str) -> Option<url::Url> {
    let input = input.trim();
    if input.contains(char::is_whitespace) {
        return None;
    }
    url::Url::parse(input)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}

/// Resolve text input. A URL is fetched when a loader is available; any
/// failure falls back to the literal string instead of failing the request.
pub async fn resolve(loader: Option<&dyn ArticleLoader>, input: &str) -> ArticleSource {
    let (Some(loader), Some(url)) = (loader, as_web_url(input)) else {
        return ArticleSource::Literal(input.to_string());
    };

    match loader.load(url.as_str()).await {
        Ok(article) => {
            info!(url = %article.url, chars = article.text.len(), "analyzing fetched article");
            ArticleSource::Fetched(article)
        }
        Err(e) => {
            warn!(%url, error = %e, "article fetch failed, analyzing the URL as text");
            ArticleSource::Literal(input.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_as_web_url() {
        assert!(as_web_url("https://example.com/post").is_some());
        assert!(as_web_url("  http://example.com  ").is_some());
        assert!(as_web_url("ftp://example.com/file").is_none());
        assert!(as_web_url("see https://example.com for details").is_none());
        assert!(as_web_url("just some text").is_none());
        assert!(as_web_url("mailto:someone@example.com").is_none());
    }

    #[tokio::test]
    async fn test_plain_text_never_loads() {
        let loader = MockArticleLoader::new();
        let source = resolve(Some(&loader as &dyn ArticleLoader), "Plain article text.").await;
        assert!(matches!(source, ArticleSource::Literal(text) if text == "Plain article text."));
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_literal() {
        let mut loader = MockArticleLoader::new();
        loader
            .expect_load()
            .times(1)
            .returning(|_| Err(ArticleError::NoContent));

        let source = resolve(Some(&loader as &dyn ArticleLoader), "https://example.com/gone").await;
        assert!(matches!(source, ArticleSource::Literal(text) if text == "https://example.com/gone"));
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mut loader = MockArticleLoader::new();
        loader.expect_load().times(1).returning(|url| {
            Ok(ExtractedArticle {
                url: url::Url::parse(url).unwrap(),
                title: "Title".to_string(),
                text: "Body".to_string(),
                fetched_at: Utc::now(),
            })
        });

        let source = resolve(Some(&loader as &dyn ArticleLoader), "https://example.com/post").await;
        assert!(matches!(source, ArticleSource::Fetched(article) if article.title == "Title"));
    }

    #[tokio::test]
    async fn test_disabled_loader_keeps_url() {
        let source = resolve(None, "https://example.com/post").await;
        assert!(matches!(source, ArticleSource::Literal(_)));
    }
}
