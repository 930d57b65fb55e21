//! Turns a fetched HTML page into plain readable text.

pub mod cleaner;
pub mod model;
pub mod reader;
pub mod reject;

pub use cleaner::{normalize_whitespace, sanitize_text, strip_html, truncate_chars};
pub use model::ExtractedArticle;

use crate::fetcher::types::PageResponse;

pub fn extract(resp: &PageResponse) -> Option<ExtractedArticle> {
    let readable = reader::extract(&resp.body_utf8, &resp.url_final)?;

    // Readability output can still carry markup and ragged whitespace.
    let text = normalize_whitespace(&strip_html(&readable.text));
    let title = normalize_whitespace(&readable.title);

    if reject::should_reject(&title, &text) {
        return None;
    }

    Some(ExtractedArticle {
        url: resp.url_final.clone(),
        title,
        text,
        fetched_at: resp.fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use url::Url;

    fn page(html: String, url: &str) -> PageResponse {
        PageResponse {
            url_final: Url::parse(url).unwrap(),
            body_utf8: html,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_extract_article_text() {
        let html = format!(
            r#"<!DOCTYPE html><html><head><title>Quarterly Results</title>
            <script>var tracking = true;</script></head>
            <body><nav>Home | About</nav><article><h1>Quarterly Results</h1><p>{}</p></article></body></html>"#,
            "Revenue grew 4% year over year to $194 million in the fourth quarter. ".repeat(10)
        );

        let content = extract(&page(html, "https://example.com/results")).unwrap();
        assert!(content.title.contains("Quarterly Results"));
        assert!(content.text.contains("$194 million"));
        assert!(!content.text.contains("var tracking"));
        assert!(!content.text.contains("  "));
    }

    #[test]
    fn test_reject_page_without_content() {
        let html = "<html><head><title>Loading</title></head><body><p>Please enable JavaScript.</p></body></html>";
        assert!(extract(&page(html.to_string(), "https://example.com/app")).is_none());
    }
}
