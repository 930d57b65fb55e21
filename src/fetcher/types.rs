use chrono::{DateTime, Utc};
use url::Url;

/// A fetched HTML page, already decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub body_utf8: String,
    pub fetched_at: DateTime<Utc>,
}
