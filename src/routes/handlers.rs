use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use super::{
    dtos::{
        AnalyzeRequest, ErrorResponse, GenerateSubjectRequest, MediaMetadataRequest,
        SubjectLineResponse,
    },
    error::ApiError,
};
use crate::{
    analyzer::{AnalysisInput, AnalysisResult},
    app_state::AppState,
    classifier::{self, ContentKind},
    media::MediaMetadata,
};

fn media_kind(media_type: &str) -> Option<ContentKind> {
    match media_type.to_ascii_lowercase().as_str() {
        "video" => Some(ContentKind::Video),
        "podcast" => Some(ContentKind::Podcast),
        _ => None,
    }
}

fn invalid_media_url(kind: &str, url: &str) -> ApiError {
    ApiError::InvalidMediaUrl(format!("Could not find a {kind} id in {url}"))
}

#[utoipa::path(
    post,
    path = "/media-metadata",
    tag = "media",
    request_body = MediaMetadataRequest,
    responses(
        (status = 200, description = "Normalized media metadata", body = MediaMetadata),
        (status = 400, description = "Missing fields or unrecognised media URL", body = ErrorResponse),
        (status = 500, description = "Platform API failure", body = ErrorResponse)
    )
)]
pub async fn media_metadata(
    State(state): State<AppState>,
    payload: Result<Json<MediaMetadataRequest>, JsonRejection>,
) -> Result<Json<MediaMetadata>, ApiError> {
    let Json(payload) = payload?;
    let (url, media_type) = payload.validate().map_err(ApiError::Validation)?;

    let media = media_kind(media_type)
        .and_then(|kind| classifier::classify_as(url, kind))
        .ok_or_else(|| invalid_media_url(media_type, url))?;
    info!(platform = ?media.platform, id = ?media.platform_id, "fetching media metadata");

    let metadata = state.metadata.fetch(&media).await.map_err(ApiError::Metadata)?;
    Ok(Json(metadata))
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Summary, email draft and social post", body = AnalysisResult),
        (status = 400, description = "Empty input or unrecognised media URL", body = ErrorResponse),
        (status = 500, description = "Metadata or analysis failure", body = ErrorResponse)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(payload) = payload?;
    let input = payload.validate().map_err(ApiError::Validation)?;
    let options = payload.options();

    let kind = match payload.content_type {
        Some(kind) => kind,
        None => match classifier::classify(input) {
            Some(media) => media.kind,
            None if classifier::looks_like_media_url(input) => {
                return Err(invalid_media_url("media", input));
            }
            None => ContentKind::Article,
        },
    };

    let (analysis_input, kind) = match (kind, payload.media_metadata.clone()) {
        (ContentKind::Article, _) => (AnalysisInput::Text(input.to_string()), kind),
        (_, Some(metadata)) => (AnalysisInput::Media(metadata), kind),
        (_, None) => match classifier::classify_as(input, kind) {
            Some(media) => {
                let metadata = state.metadata.fetch(&media).await.map_err(ApiError::Metadata)?;
                (AnalysisInput::Media(metadata), kind)
            }
            None if classifier::looks_like_media_url(input) => {
                return Err(invalid_media_url(kind.as_str(), input));
            }
            // Free text labelled as media: nothing to look up.
            None => (AnalysisInput::Text(input.to_string()), ContentKind::Article),
        },
    };

    let result = state
        .analyzer
        .analyze(analysis_input, kind, options)
        .await
        .map_err(ApiError::Analysis)?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/generate-subject",
    tag = "analysis",
    request_body = GenerateSubjectRequest,
    responses(
        (status = 200, description = "Generated subject line", body = SubjectLineResponse),
        (status = 400, description = "Missing email content", body = ErrorResponse),
        (status = 500, description = "Completion failure", body = ErrorResponse)
    )
)]
pub async fn generate_subject(
    State(state): State<AppState>,
    payload: Result<Json<GenerateSubjectRequest>, JsonRejection>,
) -> Result<Json<SubjectLineResponse>, ApiError> {
    let Json(payload) = payload?;
    let (email, url) = payload.validate().map_err(ApiError::Validation)?;

    let subject_line = state
        .subjects
        .generate(email, url)
        .await
        .map_err(ApiError::Subject)?;
    Ok(Json(SubjectLineResponse { subject_line }))
}
