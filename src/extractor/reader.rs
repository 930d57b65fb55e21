use readability::extractor;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::extractor::model::ReadableText;

const CONTENT_SELECTORS: [&str; 8] = [
    "article",
    "main",
    "[role='main']",
    ".content",
    ".post",
    ".article",
    "#content",
    ".entry-content",
];

const MIN_BLOCK_LEN: usize = 100;

pub fn extract(html: &str, url: &Url) -> Option<ReadableText> {
    if let Ok(article) = extractor::extract(&mut html.as_bytes(), url)
        && !article.text.trim().is_empty()
    {
        return Some(ReadableText {
            title: article.title,
            text: article.text,
        });
    }

    fallback_extract(html)
}

/// Plain DOM heuristics for pages readability gives up on.
fn fallback_extract(html: &str) -> Option<ReadableText> {
    let document = Html::parse_document(html);
    let title = first_text(&document, &["meta[property='og:title']", "title", "h1"])?;

    let text = CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .flat_map(|selector| {
            document
                .select(&selector)
                .map(element_text)
                .collect::<Vec<_>>()
        })
        .find(|text| text.trim().len() > MIN_BLOCK_LEN)
        .or_else(|| {
            let body = Selector::parse("body").ok()?;
            document.select(&body).next().map(element_text)
        })?;

    if text.trim().is_empty() {
        return None;
    }

    Some(ReadableText { title, text })
}

fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector in selectors.iter().filter_map(|s| Selector::parse(s).ok()) {
        for element in document.select(&selector) {
            let text = match element.value().attr("content") {
                Some(content) => content.to_string(),
                None => element_text(element),
            };
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}
