//! Decoding of the multipart upload form into an [`UploadRequest`].

use crate::error::ApiError;
use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use ota_core::{UploadRequest, MAX_PAYLOAD_BYTES};

/// Form field carrying the version label.
pub const VERSION_FIELD: &str = "version";

/// Form field carrying the firmware file.
pub const FIRMWARE_FIELD: &str = "firmware";

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge;
    }
    ApiError::bad_request("Malformed upload", e.body_text())
}

/// Collects a file field chunk by chunk into a single buffer.
///
/// Stops one byte past the payload limit so the store still reports the oversize upload.
async fn read_file_field(mut field: Field<'_>) -> Result<Vec<u8>, ApiError> {
    let cap = MAX_PAYLOAD_BYTES as usize + 1;
    let mut payload = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        let take = chunk.len().min(cap - payload.len());
        payload.extend_from_slice(&chunk[..take]);
        if payload.len() == cap {
            break;
        }
    }
    Ok(payload)
}

/// Reads the upload form.
///
/// Accepts one optional `version` text field and exactly one `firmware` file. Other text
/// fields are ignored; any other file field is rejected.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest, ApiError> {
    let mut version = None;
    let mut firmware: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);

        match (name.as_str(), file_name) {
            (FIRMWARE_FIELD, Some(file_name)) => {
                if firmware.is_some() {
                    return Err(ApiError::bad_request(
                        "Too many files",
                        "Only one firmware file can be uploaded at a time",
                    ));
                }
                let payload = read_file_field(field).await?;
                firmware = Some((file_name, payload));
            }
            (VERSION_FIELD, None) => {
                version = Some(field.text().await.map_err(multipart_error)?);
            }
            (_, Some(_)) => {
                return Err(ApiError::bad_request(
                    "Unexpected file field",
                    format!("Upload the firmware file in the '{}' field", FIRMWARE_FIELD),
                ));
            }
            (_, None) => {
                tracing::debug!("ignoring form field '{}'", name);
            }
        }
    }

    let Some((filename, payload)) = firmware else {
        return Err(ApiError::bad_request(
            "No file uploaded",
            "Please choose a firmware file",
        ));
    };

    Ok(UploadRequest {
        version: version.unwrap_or_default(),
        filename,
        payload,
    })
}
