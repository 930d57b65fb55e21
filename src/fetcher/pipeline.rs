//! Charset detection and decoding of fetched HTML.
//!
//! Lookup order: the Content-Type header, a `<meta>` declaration in the first
//! 4KB of the body, then statistical detection.

use crate::fetcher::errors::FetchError;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;

const SNIFF_LEN: usize = 4096;

static HEADER_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

// Covers both `<meta charset=..>` and the http-equiv Content-Type form.
static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s;/>]+)"#).unwrap()
});

pub fn decode_body(content_type: &str, body: &[u8]) -> Result<(String, &'static str), FetchError> {
    let encoding = detect_encoding(content_type, body);
    let (decoded, _, had_errors) = encoding.decode(body);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "content is not valid {}",
            encoding.name()
        )));
    }
    Ok((decoded.into_owned(), encoding.name()))
}

fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_from(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let head = &body[..body.len().min(SNIFF_LEN)];
    let head_str = String::from_utf8_lossy(head);
    if let Some(encoding) = label_from(&META_CHARSET, &head_str) {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, body.len() <= SNIFF_LEN);
    detector.guess(None, true)
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_charset_wins() {
        let encoding = detect_encoding("text/html; charset=utf-8", b"<meta charset=\"latin1\">");
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_meta_charset() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>T</title></head></html>";
        // encoding_rs maps ISO-8859-1 onto its windows-1252 superset
        assert_eq!(detect_encoding("text/html", body), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_meta_http_equiv() {
        let body = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=shift_jis\">";
        assert_eq!(detect_encoding("text/html", body), encoding_rs::SHIFT_JIS);
    }

    #[test]
    fn test_decode_windows_1252() {
        let (text, name) = decode_body("text/html; charset=windows-1252", b"caf\xe9").unwrap();
        assert_eq!(text, "café");
        assert_eq!(name, "windows-1252");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = decode_body("text/html; charset=utf-8", b"bad \xff\xfe bytes");
        assert!(matches!(result, Err(FetchError::Charset(_))));
    }
}
