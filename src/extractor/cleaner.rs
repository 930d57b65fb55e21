use ammonia::Builder;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove markup, keeping only the visible text. Script and style bodies are
/// dropped entirely and entities are decoded.
pub fn strip_html(input: &str) -> String {
    if !input.contains('<') && !input.contains('&') {
        return input.to_string();
    }
    let cleaned = Builder::default().clean(input).to_string();
    let fragment = Html::parse_fragment(&cleaned);
    fragment.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Collapse every run of whitespace, newlines included, into one space.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Cap `text` at `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Full preparation of user-supplied text before it goes upstream.
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let text = normalize_whitespace(&strip_html(input));
    truncate_chars(&text, max_chars).trim_end().to_string()
}
