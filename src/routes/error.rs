use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use super::dtos::ErrorResponse;
use crate::{
    analyzer::{AnalysisError, CompletionError},
    media::MetadataError,
};

/// Every failure a handler can return. No partial results: a request either
/// yields its full response or one of these.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    BadBody { status: StatusCode, message: String },
    InvalidMediaUrl(String),
    Metadata(MetadataError),
    Analysis(AnalysisError),
    Subject(AnalysisError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413, everything else is a bad request.
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::BadBody {
            status,
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, "Invalid input", message.clone()),
            Self::BadBody { status, message } => (*status, "Invalid request body", message.clone()),
            Self::InvalidMediaUrl(message) => {
                (StatusCode::BAD_REQUEST, "Invalid media URL", message.clone())
            }
            Self::Metadata(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch media metadata",
                metadata_message(e),
            ),
            Self::Analysis(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to analyze content",
                analysis_message(e),
            ),
            Self::Subject(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate subject line",
                analysis_message(e),
            ),
        }
    }
}

// Client-facing text never includes upstream error detail; that stays in the
// logs.
fn metadata_message(error: &MetadataError) -> String {
    match error {
        MetadataError::MissingCredential(name) => format!("{name} credentials are not configured"),
        MetadataError::NotFound { .. } => "No media was found for this URL".to_string(),
        MetadataError::UnsupportedId(_) => {
            "The URL does not identify a supported media item".to_string()
        }
        MetadataError::Request { .. } | MetadataError::Http { .. } | MetadataError::Decode { .. } => {
            "The media platform request failed".to_string()
        }
    }
}

fn analysis_message(error: &AnalysisError) -> String {
    match error {
        AnalysisError::Completion(CompletionError::MissingApiKey) => {
            "OpenAI API key is not configured".to_string()
        }
        AnalysisError::Parse(_) => "The model response could not be processed".to_string(),
        AnalysisError::EmptyCompletion => "The model returned an empty response".to_string(),
        AnalysisError::Completion(_) => "The language model request failed".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();

        if status.is_server_error() {
            error!(%status, error, detail = ?self, "request failed");
        } else {
            warn!(%status, error, %message, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Platform;
    use axum::body::to_bytes;

    async fn body(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400() {
        let (status, body) = body(ApiError::Validation("missing".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid input");
        assert_eq!(body.message, "missing");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let (status, body) = body(ApiError::Metadata(MetadataError::Http {
            platform: Platform::Vimeo,
            status: StatusCode::UNAUTHORIZED,
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to fetch media metadata");
        assert_eq!(body.message, "The media platform request failed");
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_echoed() {
        let (_, body) = body(ApiError::Metadata(MetadataError::Request {
            platform: Platform::Youtube,
            message: "connection refused for key=abc".to_string(),
        }))
        .await;
        assert!(!body.message.contains("key=abc"));

        let (_, body) = self::body(ApiError::Subject(AnalysisError::Completion(
            CompletionError::Http {
                status: StatusCode::UNAUTHORIZED,
                body: "Incorrect API key provided: sk-abc".to_string(),
            },
        )))
        .await;
        assert_eq!(body.error, "Failed to generate subject line");
        assert!(!body.message.contains("sk-abc"));
    }

    #[tokio::test]
    async fn test_missing_credential_is_named() {
        let (_, body) = body(ApiError::Metadata(MetadataError::MissingCredential("Vimeo"))).await;
        assert_eq!(body.message, "Vimeo credentials are not configured");
    }

    #[tokio::test]
    async fn test_parse_failure_is_generic() {
        let (status, body) =
            body(ApiError::Analysis(AnalysisError::Parse("expected value at line 1".to_string())))
                .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.message.contains("line 1"));
    }
}
