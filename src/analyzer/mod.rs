//! Content analysis: prompt construction, the completion call and parsing of
//! the model's JSON reply.

pub mod article;
pub mod completion;
pub mod prompts;
pub mod result;
pub mod subject;

pub use article::{ArticleLoader, ArticleSource, WebArticleLoader};
pub use completion::{ChatMessage, CompletionClient, CompletionError, CompletionRequest, OpenAiClient};
pub use prompts::{AnalysisOptions, PromptProfile};
pub use result::{AnalysisResult, EmojiSuggestions};
pub use subject::{SubjectGenerator, clean_subject_line};

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    classifier::ContentKind, config::AnalysisSettings, extractor::sanitize_text,
    media::MediaMetadata,
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("model response was not valid JSON: {0}")]
    Parse(String),

    #[error("model returned an empty response")]
    EmptyCompletion,
}

/// What is being analyzed.
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    Text(String),
    Media(MediaMetadata),
}

pub struct Analyzer {
    completion: Arc<dyn CompletionClient>,
    articles: Option<Arc<dyn ArticleLoader>>,
    settings: AnalysisSettings,
}

impl Analyzer {
    /// `articles` is only consulted when URL fetching is enabled in
    /// `settings`.
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        articles: Option<Arc<dyn ArticleLoader>>,
        settings: AnalysisSettings,
    ) -> Self {
        let articles = articles.filter(|_| settings.fetch_article_urls);
        Self {
            completion,
            articles,
            settings,
        }
    }

    #[instrument(skip_all, fields(kind = kind.as_str(), emojis = options.include_emojis))]
    pub async fn analyze(
        &self,
        input: AnalysisInput,
        kind: ContentKind,
        options: AnalysisOptions,
    ) -> Result<AnalysisResult, AnalysisError> {
        let user_message = match input {
            AnalysisInput::Media(metadata) => prompts::media_message(kind, &metadata),
            AnalysisInput::Text(text) => self.text_message(&text).await,
        };

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::system_prompt(kind, self.settings.profile, options)),
                ChatMessage::user(user_message),
            ],
            temperature: self.settings.effective_temperature(),
        };

        let raw = self.completion.complete(request).await?;
        debug!(chars = raw.len(), "parsing analysis response");
        result::parse_analysis(&raw, options)
    }

    async fn text_message(&self, text: &str) -> String {
        let max = self.settings.max_input_chars;
        match article::resolve(self.articles.as_deref(), text).await {
            ArticleSource::Fetched(article) => prompts::fetched_article_message(
                article.url.as_str(),
                &article.title,
                &sanitize_text(&article.text, max),
            ),
            ArticleSource::Literal(text) => prompts::article_message(&sanitize_text(&text, max)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::completion::{MockCompletionClient, Role};

    fn settings() -> AnalysisSettings {
        AnalysisSettings {
            max_input_chars: 50,
            ..AnalysisSettings::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_returns_parsed_result() {
        let mut completion = MockCompletionClient::new();
        completion.expect_complete().times(1).returning(|_| {
            Ok(r#"{"summary":["a"],"emailDraft":"e","socialPost":"s"}"#.to_string())
        });

        let analyzer = Analyzer::new(Arc::new(completion), None, settings());
        let result = analyzer
            .analyze(
                AnalysisInput::Text("some text".to_string()),
                ContentKind::Article,
                AnalysisOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"summary": ["a"], "emailDraft": "e", "socialPost": "s"})
        );
    }

    #[tokio::test]
    async fn test_text_is_sanitized_and_capped() {
        let mut completion = MockCompletionClient::new();
        completion
            .expect_complete()
            .withf(|request| {
                let user = &request.messages[1];
                user.role == Role::User
                    && user.content.starts_with("Please analyze this article: Hello world")
                    && !user.content.contains('<')
                    && user.content.chars().count() <= "Please analyze this article: ".len() + 50
                    && request.temperature == 0.3
            })
            .times(1)
            .returning(|_| Ok("{}".to_string()));

        let analyzer = Analyzer::new(Arc::new(completion), None, settings());
        let input = format!("<p>Hello   <b>world</b></p>{}", " filler".repeat(40));
        analyzer
            .analyze(
                AnalysisInput::Text(input),
                ContentKind::Article,
                AnalysisOptions::default(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_media_uses_kind_template() {
        let mut completion = MockCompletionClient::new();
        completion
            .expect_complete()
            .withf(|request| {
                request.messages[0].content.contains("episode metadata")
                    && request.messages[1]
                        .content
                        .starts_with("Please analyze this podcast episode:")
            })
            .times(1)
            .returning(|_| Ok(r#"{"summary":["x"]}"#.to_string()));

        let analyzer = Analyzer::new(Arc::new(completion), None, settings());
        let metadata = MediaMetadata {
            title: "Ep".to_string(),
            channel: "Show".to_string(),
            ..Default::default()
        };
        let result = analyzer
            .analyze(
                AnalysisInput::Media(metadata),
                ContentKind::Podcast,
                AnalysisOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.summary, vec!["x"]);
        assert_eq!(result.email_draft, "");
    }

    #[tokio::test]
    async fn test_invalid_model_json_fails() {
        let mut completion = MockCompletionClient::new();
        completion
            .expect_complete()
            .returning(|_| Ok("Here is your summary: ...".to_string()));

        let analyzer = Analyzer::new(Arc::new(completion), None, settings());
        let result = analyzer
            .analyze(
                AnalysisInput::Text("text".to_string()),
                ContentKind::Article,
                AnalysisOptions::default(),
            )
            .await;
        assert!(matches!(result, Err(AnalysisError::Parse(_))));
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        let mut completion = MockCompletionClient::new();
        completion
            .expect_complete()
            .returning(|_| Err(CompletionError::MissingApiKey));

        let analyzer = Analyzer::new(Arc::new(completion), None, settings());
        let result = analyzer
            .analyze(
                AnalysisInput::Text("text".to_string()),
                ContentKind::Article,
                AnalysisOptions::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(AnalysisError::Completion(CompletionError::MissingApiKey))
        ));
    }

    #[tokio::test]
    async fn test_disabled_fetch_ignores_loader() {
        let loader = article::MockArticleLoader::new();
        let mut completion = MockCompletionClient::new();
        completion
            .expect_complete()
            .withf(|request| {
                request.messages[1].content == "Please analyze this article: https://example.com/a"
            })
            .returning(|_| Ok("{}".to_string()));

        let analyzer = Analyzer::new(
            Arc::new(completion),
            Some(Arc::new(loader)),
            AnalysisSettings {
                fetch_article_urls: false,
                ..settings()
            },
        );
        analyzer
            .analyze(
                AnalysisInput::Text("https://example.com/a".to_string()),
                ContentKind::Article,
                AnalysisOptions::default(),
            )
            .await
            .unwrap();
    }
}
