pub mod chat;
pub mod documents;
pub mod health;
pub mod organizations;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{routing::delete, routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::logging::request_logger;
use crate::api::state::AppState;
use crate::domain::DomainError;

/// Uploads are held in memory while they are chunked; cap them well above
/// any sane policy manual but below what would hurt the process.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.config.cors.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_v1_routes())
        .layer(axum::middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations",
            post(organizations::create_organization),
        )
        .route(
            "/organizations/{org_id}/documents",
            post(documents::upload_document).get(documents::list_documents),
        )
        .route(
            "/organizations/{org_id}/documents/{id}",
            delete(documents::delete_document),
        )
        .route("/search", post(documents::search_documents))
        .route("/chat", post(chat::chat_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Maps a domain failure to a response, logging it once at the boundary.
pub(crate) fn into_response_error(err: DomainError) -> (StatusCode, String) {
    let status = match err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        DomainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, "request rejected");
    }

    (status, err.to_string())
}
