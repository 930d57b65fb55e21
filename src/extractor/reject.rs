const MIN_CONTENT_LENGTH: usize = 250;
const MIN_WORD_COUNT: usize = 50;
const MAX_BOILERPLATE_RATIO: f64 = 0.3;

const BOILERPLATE_KEYWORDS: [&str; 16] = [
    "cookie",
    "privacy",
    "consent",
    "subscribe",
    "newsletter",
    "login",
    "sign up",
    "password",
    "404",
    "not found",
    "access denied",
    "loading",
    "please wait",
    "javascript",
    "enable",
    "browser",
];

/// Whether extracted text is too thin or too boilerplate-heavy to be worth
/// summarizing instead of the raw URL.
pub fn should_reject(title: &str, text: &str) -> bool {
    if text.chars().count() < MIN_CONTENT_LENGTH {
        return true;
    }

    let word_count = text.split_whitespace().count();
    if title.trim().is_empty() && word_count < MIN_WORD_COUNT {
        return true;
    }

    boilerplate_ratio(text, word_count) > MAX_BOILERPLATE_RATIO
}

fn boilerplate_ratio(text: &str, word_count: usize) -> f64 {
    if word_count == 0 {
        return 1.0;
    }
    let lower = text.to_lowercase();
    let hits: usize = BOILERPLATE_KEYWORDS
        .iter()
        .map(|keyword| lower.matches(keyword).count())
        .sum();
    hits as f64 / word_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_rejected() {
        assert!(should_reject("Title", "Too short."));
    }

    #[test]
    fn test_cookie_wall_rejected() {
        let text = "We use cookie tracking. Accept cookie consent or manage privacy. ".repeat(10);
        assert!(should_reject("Consent", &text));
    }

    #[test]
    fn test_real_article_accepted() {
        let text = "The independent exchange reported fourth quarter revenue of $194 million, \
                    with profit rising to $36 million from $31 million a year earlier. "
            .repeat(5);
        assert!(!should_reject("Earnings", &text));
    }
}
