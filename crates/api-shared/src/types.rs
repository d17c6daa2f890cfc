//! Request and response bodies shared by the REST API and the CLI.
//!
//! Field names are serialised in camelCase to match the existing web frontend.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored firmware image as presented to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Firmware {
    /// Artifact filename, also its identifier
    pub filename: String,
    /// Version label decoded from the filename
    pub version: String,
    /// Size in bytes
    pub size: u64,
    /// Human-readable size, e.g. `1.5 MB`
    pub size_formatted: String,
    /// Upload time in milliseconds since the Unix epoch
    pub uploaded_at: i64,
    /// Upload time as RFC 3339 (UTC)
    pub upload_time: String,
    /// Absolute URL the image can be downloaded from
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFirmwaresRes {
    pub success: bool,
    pub data: Vec<Firmware>,
    pub total: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareRes {
    pub success: bool,
    pub data: Firmware,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFirmwareRes {
    pub success: bool,
    pub data: Firmware,
    pub message: String,
}

/// Multipart form accepted by the upload endpoint (documentation only).
#[derive(Debug, Clone, ToSchema)]
pub struct UploadFirmwareForm {
    /// Version label; defaults to `v1.0.0` when omitted
    pub version: Option<String>,
    /// Exactly one `.bin` file, at most 50 MiB
    #[schema(value_type = String, format = Binary)]
    pub firmware: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFirmwareRes {
    pub success: bool,
    pub message: String,
    pub filename: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRes {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<String>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: impl Into<String>) -> Self {
        self.max_size = Some(max_size.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Current server time, RFC 3339
    pub timestamp: String,
    pub uptime_seconds: u64,
    /// Base URL the request reached the server on
    pub server: String,
}
