//! # API REST
//!
//! REST API for the OTA firmware repository.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Multipart upload decoding
//! - Per-client rate limiting
//! - OpenAPI documentation
//! - REST-specific concerns (JSON serialization, CORS, security headers, static frontend)
//!
//! Uses `api-shared` for response types and `ota-core` for firmware operations.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod state;
pub mod upload;

pub use error::ApiError;
pub use state::AppState;

use api_shared::{
    DeleteFirmwareRes, ErrorRes, Firmware, FirmwareRes, HealthRes, ListFirmwaresRes,
    UploadFirmwareForm, UploadFirmwareRes,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue},
    middleware,
    routing::{delete, get, post},
    Router,
};
use ota_core::MAX_PAYLOAD_BYTES;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Room for multipart framing and the version field on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

const UPLOAD_BODY_LIMIT: usize = MAX_PAYLOAD_BYTES as usize + MULTIPART_OVERHEAD_BYTES;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_firmwares,
        handlers::get_firmware,
        handlers::upload_firmware,
        handlers::delete_firmware,
        handlers::download_firmware,
    ),
    components(schemas(
        Firmware,
        HealthRes,
        ListFirmwaresRes,
        FirmwareRes,
        UploadFirmwareRes,
        UploadFirmwareForm,
        DeleteFirmwareRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the complete application router.
///
/// Unknown paths fall through to the prebuilt frontend when one is configured, with
/// `index.html` served for client-side routes; otherwise they get a JSON 404.
pub fn router(state: AppState) -> Router {
    let upload = post(handlers::upload_firmware)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_uploads,
        ));

    let app = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/firmwares", get(handlers::list_firmwares))
        .route("/api/firmwares/:filename", get(handlers::get_firmware))
        .route("/api/upload", upload)
        .route("/api/delete/:filename", delete(handlers::delete_firmware))
        .route("/firmwares/:filename", get(handlers::download_firmware))
        .route("/api-docs/openapi.json", get(handlers::openapi_json));

    let app = match &state.frontend_dir {
        Some(dir) => {
            tracing::info!("serving frontend from {}", dir.display());
            app.fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
            )
        }
        None => app.fallback(handlers::not_found),
    };

    app.layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit::limit_requests,
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("cross-origin"),
    ))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
