use std::sync::Arc;

use crate::{
    analyzer::{
        Analyzer, ArticleLoader, CompletionClient, OpenAiClient, SubjectGenerator,
        WebArticleLoader,
    },
    config::Config,
    fetcher,
    health::ServiceStatus,
    media::{MediaClient, MetadataSource},
};

/// Everything a request handler needs. Built once at startup; nothing in it
/// is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<dyn MetadataSource>,
    pub analyzer: Arc<Analyzer>,
    pub subjects: Arc<SubjectGenerator>,
    pub status: Arc<ServiceStatus>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let api_client = fetcher::build_api_client()?;
        let pages = fetcher::PageFetcher::new(fetcher::HostPolicy::PublicOnly)?;

        let completion: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(
            api_client.clone(),
            config.credentials().openai_api_key.clone(),
            config.upstream().openai.clone(),
        ));
        let articles: Arc<dyn ArticleLoader> = Arc::new(WebArticleLoader::new(pages));
        let metadata = Arc::new(MediaClient::new(
            api_client,
            config.credentials().clone(),
            config.upstream().clone(),
        ));

        Ok(Self::from_parts(metadata, completion, Some(articles), config))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        metadata: Arc<dyn MetadataSource>,
        completion: Arc<dyn CompletionClient>,
        articles: Option<Arc<dyn ArticleLoader>>,
        config: &Config,
    ) -> Self {
        let settings = config.analysis().clone();
        let subjects = SubjectGenerator::new(completion.clone(), settings.model.clone());
        Self {
            metadata,
            analyzer: Arc::new(Analyzer::new(completion, articles, settings)),
            subjects: Arc::new(subjects),
            status: Arc::new(ServiceStatus::from_config(config)),
        }
    }
}
