use chrono::{DateTime, Utc};
use url::Url;

/// Readable text pulled out of an article page.
#[derive(Debug, Clone)]
pub struct ExtractedArticle {
    pub url: Url,
    pub title: String,
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ReadableText {
    pub title: String,
    pub text: String,
}
