use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    analyzer::AnalysisOptions,
    classifier::ContentKind,
    media::MediaMetadata,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MediaMetadataRequest {
    pub url: Option<String>,
    /// `video` or `podcast`.
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

impl MediaMetadataRequest {
    /// Both fields, trimmed, or a validation message.
    pub fn validate(&self) -> Result<(&str, &str), String> {
        let url = self.url.as_deref().map(str::trim).unwrap_or_default();
        let media_type = self.media_type.as_deref().map(str::trim).unwrap_or_default();
        if url.is_empty() || media_type.is_empty() {
            return Err("URL and type are required".to_string());
        }
        Ok((url, media_type))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// URL or free text. `url` is accepted as an alias.
    #[serde(alias = "url")]
    pub input: Option<String>,
    pub content_type: Option<ContentKind>,
    pub media_metadata: Option<MediaMetadata>,
    #[serde(default)]
    pub include_emojis: bool,
    #[serde(default)]
    pub include_subject_line: bool,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<&str, String> {
        let input = self.input.as_deref().map(str::trim).unwrap_or_default();
        if input.is_empty() {
            return Err("Please provide a URL or text content to analyze".to_string());
        }
        Ok(input)
    }

    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            include_emojis: self.include_emojis,
            include_subject_line: self.include_subject_line,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSubjectRequest {
    pub email_content: Option<String>,
    pub original_url: Option<String>,
}

impl GenerateSubjectRequest {
    pub fn validate(&self) -> Result<(&str, Option<&str>), String> {
        let email = self.email_content.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Err("Email content is required".to_string());
        }
        let url = self
            .original_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        Ok((email, url))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectLineResponse {
    pub subject_line: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
