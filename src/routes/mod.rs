//! HTTP boundary: routes, request/response shapes and error mapping.

pub mod dtos;
pub mod error;
pub mod handlers;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderName,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    analyzer::{AnalysisResult, EmojiSuggestions},
    app_state::AppState,
    classifier::ContentKind,
    health,
    media::MediaMetadata,
};

/// Large pasted articles are expected; anything beyond this is refused.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::health_check,
        handlers::media_metadata,
        handlers::analyze,
        handlers::generate_subject,
    ),
    components(schemas(
        ContentKind,
        MediaMetadata,
        AnalysisResult,
        EmojiSuggestions,
        dtos::MediaMetadataRequest,
        dtos::AnalyzeRequest,
        dtos::GenerateSubjectRequest,
        dtos::SubjectLineResponse,
        dtos::ErrorResponse,
        health::LivenessResponse,
        health::ServiceStatus,
    )),
    tags(
        (name = "health", description = "Liveness and configuration status"),
        (name = "media", description = "Video and podcast metadata lookup"),
        (name = "analysis", description = "Summaries, email drafts and social posts")
    )
)]
pub struct ApiDoc;

/// The API routes without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::liveness))
        .route("/healthz", get(health::health_check))
        .route("/media-metadata", post(handlers::media_metadata))
        .route("/analyze", post(handlers::analyze))
        .route("/generate-subject", post(handlers::generate_subject))
}

/// Full application router with docs and the middleware stack.
pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    api_routes()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}
