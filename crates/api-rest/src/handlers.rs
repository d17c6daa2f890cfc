//! REST handlers.
//!
//! Store calls are blocking filesystem operations, so every handler that touches the
//! artifact directory runs them on tokio's blocking pool.

use crate::error::ApiError;
use crate::state::AppState;
use crate::upload::read_upload;
use crate::ApiDoc;
use api_shared::{
    DeleteFirmwareRes, ErrorRes, FirmwareRes, HealthRes, ListFirmwaresRes, UploadFirmwareForm,
    UploadFirmwareRes,
};
use axum::{
    extract::{Multipart, Path as AxumPath, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use ota_core::CoreResult;
use utoipa::OpenApi;

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost";

/// Base URL the client used to reach the server, e.g. `https://ota.example.com`.
///
/// Honours `x-forwarded-proto` so links stay correct behind a TLS-terminating proxy.
pub fn base_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SCHEME);
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_HOST);
    format!("{}://{}", scheme, host)
}

async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>, headers: HeaderMap) -> Json<HealthRes> {
    Json(state.health.check_health(&base_url(&headers)))
}

#[utoipa::path(
    get,
    path = "/api/firmwares",
    responses(
        (status = 200, description = "Stored firmware, most recent first", body = ListFirmwaresRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all stored firmware images
#[axum::debug_handler]
pub async fn list_firmwares(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListFirmwaresRes>, ApiError> {
    let base = base_url(&headers);
    let service = state.firmware_service.clone();
    let data = run_blocking(move || service.list(&base)).await?;

    Ok(Json(ListFirmwaresRes {
        success: true,
        total: data.len(),
        message: format!("Found {} firmware file(s)", data.len()),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/firmwares/{filename}",
    params(("filename" = String, Path, description = "Stored firmware filename")),
    responses(
        (status = 200, description = "One stored firmware", body = FirmwareRes),
        (status = 400, description = "Invalid filename", body = ErrorRes),
        (status = 404, description = "File not found", body = ErrorRes)
    )
)]
/// Describe one stored firmware image without downloading it
#[axum::debug_handler]
pub async fn get_firmware(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(filename): AxumPath<String>,
) -> Result<Json<FirmwareRes>, ApiError> {
    let base = base_url(&headers);
    let service = state.firmware_service.clone();
    let data = run_blocking(move || service.describe(&filename, &base)).await?;

    Ok(Json(FirmwareRes {
        success: true,
        data,
    }))
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadFirmwareForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Firmware stored", body = UploadFirmwareRes),
        (status = 400, description = "Missing file, wrong extension or empty file", body = ErrorRes),
        (status = 413, description = "File larger than 50 MB", body = ErrorRes),
        (status = 429, description = "Upload rate limit exceeded", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Upload a firmware image
///
/// The stored filename is derived from the version label and the upload time; the original
/// filename is only used to check the `.bin` extension.
#[axum::debug_handler]
pub async fn upload_firmware(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<UploadFirmwareRes>, ApiError> {
    let request = read_upload(multipart).await?;
    let base = base_url(&headers);
    let service = state.firmware_service.clone();
    let data = run_blocking(move || service.upload(request, &base)).await?;

    Ok(Json(UploadFirmwareRes {
        success: true,
        message: format!("Firmware {} uploaded successfully", data.version),
        data,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/delete/{filename}",
    params(("filename" = String, Path, description = "Stored firmware filename")),
    responses(
        (status = 200, description = "Firmware deleted", body = DeleteFirmwareRes),
        (status = 400, description = "Invalid filename", body = ErrorRes),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a stored firmware image
#[axum::debug_handler]
pub async fn delete_firmware(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> Result<Json<DeleteFirmwareRes>, ApiError> {
    let service = state.firmware_service.clone();
    let target = filename.clone();
    run_blocking(move || service.delete(&target)).await?;

    Ok(Json(DeleteFirmwareRes {
        success: true,
        message: "Firmware deleted successfully".into(),
        filename,
    }))
}

#[utoipa::path(
    get,
    path = "/firmwares/{filename}",
    params(("filename" = String, Path, description = "Stored firmware filename")),
    responses(
        (status = 200, description = "Firmware image as application/octet-stream"),
        (status = 400, description = "Invalid filename", body = ErrorRes),
        (status = 404, description = "File not found", body = ErrorRes)
    )
)]
/// Download a stored firmware image
#[axum::debug_handler]
pub async fn download_firmware(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> Result<Response, ApiError> {
    let service = state.firmware_service.clone();
    let target = filename.clone();
    let bytes = run_blocking(move || service.read(&target)).await?;

    // The id only contains [A-Za-z0-9._-], so it is safe to quote as is.
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        [(header::CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response())
}

/// OpenAPI document for the REST API
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// JSON 404 for unknown routes when no frontend is served.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorRes>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorRes::new("Route not found").with_path(uri.path())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_base_url_defaults() {
        assert_eq!(base_url(&HeaderMap::new()), "http://localhost");
    }

    #[test]
    fn test_base_url_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("ota.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));

        assert_eq!(base_url(&headers), "https://ota.example.com");
    }
}
