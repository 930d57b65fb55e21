use std::sync::Arc;

use tracing::{info, instrument};

use super::{
    AnalysisError,
    completion::{ChatMessage, CompletionClient, CompletionRequest},
    prompts::{SUBJECT_SYSTEM_PROMPT, subject_message},
};

const SUBJECT_TEMPERATURE: f32 = 0.7;
const QUOTES: [char; 6] = ['"', '\'', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];
const PREFIX: &str = "subject:";

/// Turns an email draft into a short subject line.
#[derive(Clone)]
pub struct SubjectGenerator {
    completion: Arc<dyn CompletionClient>,
    model: String,
}

impl SubjectGenerator {
    pub fn new(completion: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            completion,
            model: model.into(),
        }
    }

    #[instrument(skip_all, fields(has_url = original_url.is_some()))]
    pub async fn generate(
        &self,
        email_content: &str,
        original_url: Option<&str>,
    ) -> Result<String, AnalysisError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SUBJECT_SYSTEM_PROMPT),
                ChatMessage::user(subject_message(email_content, original_url)),
            ],
            temperature: SUBJECT_TEMPERATURE,
        };

        let raw = self.completion.complete(request).await?;
        let subject = clean_subject_line(&raw);
        if subject.is_empty() {
            return Err(AnalysisError::EmptyCompletion);
        }

        info!(chars = subject.chars().count(), "generated subject line");
        Ok(subject)
    }
}

/// Strip the quoting and `Subject:` prefixes models add despite being told
/// not to. Runs to a fixed point, so applying it twice changes nothing.
pub fn clean_subject_line(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let next = strip_once(current);
        if next == current {
            return current.to_string();
        }
        current = next;
    }
}

fn strip_once(s: &str) -> &str {
    let mut s = s.trim();
    if let Some(rest) = s.strip_prefix(QUOTES) {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix(QUOTES) {
        s = rest;
    }
    let s = s.trim();
    match s.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => s[PREFIX.len()..].trim(),
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::completion::MockCompletionClient;

    #[test]
    fn test_clean_subject_line() {
        let cases = [
            ("Q4 results are in", "Q4 results are in"),
            ("\"Q4 results are in\"", "Q4 results are in"),
            ("Subject: Q4 results are in", "Q4 results are in"),
            ("SUBJECT:Q4 results", "Q4 results"),
            ("  'Subject: \"Q4\"'  ", "Q4"),
            ("\u{201c}Curly quotes\u{201d}", "Curly quotes"),
            ("Subject matter experts weigh in", "Subject matter experts weigh in"),
            ("\"\"", ""),
            ("", ""),
        ];
        for (raw, expected) in cases {
            assert_eq!(clean_subject_line(raw), expected, "raw: {raw:?}");
        }
    }

    #[test]
    fn test_clean_subject_line_is_idempotent() {
        for raw in [
            "\"Subject: 'Nested'\"",
            "subject: subject: twice",
            "'",
            "Ünïcödé “quoted”",
            "Subject:",
        ] {
            let once = clean_subject_line(raw);
            assert_eq!(clean_subject_line(&once), once, "raw: {raw:?}");
        }
    }

    #[tokio::test]
    async fn test_generate_cleans_completion() {
        let mut completion = MockCompletionClient::new();
        completion
            .expect_complete()
            .withf(|request| {
                request.messages.len() == 2
                    && request.messages[1].content.contains("https://example.com/post")
                    && request.temperature == SUBJECT_TEMPERATURE
            })
            .times(1)
            .returning(|_| Ok("Subject: \"Ad tech's rough Q4\"".to_string()));

        let generator = SubjectGenerator::new(Arc::new(completion), "gpt-3.5-turbo");
        let subject = generator
            .generate("Hi team, sharing this article.", Some("https://example.com/post"))
            .await
            .unwrap();
        assert_eq!(subject, "Ad tech's rough Q4");
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_completion() {
        let mut completion = MockCompletionClient::new();
        completion
            .expect_complete()
            .returning(|_| Ok("\"\"".to_string()));

        let generator = SubjectGenerator::new(Arc::new(completion), "gpt-3.5-turbo");
        assert!(matches!(
            generator.generate("email", None).await,
            Err(AnalysisError::EmptyCompletion)
        ));
    }

    #[cfg(feature = "fuzz")]
    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_cleanup_idempotent(raw in ".*") {
                let once = clean_subject_line(&raw);
                prop_assert_eq!(clean_subject_line(&once), once);
            }
        }
    }
}
