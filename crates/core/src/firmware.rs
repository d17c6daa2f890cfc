//! Firmware service
//!
//! Wraps the [`ArtifactStore`] with the presentation the APIs need: every artifact is
//! returned as a [`Firmware`] record carrying a formatted size, an RFC 3339 upload time and
//! a download URL built from the caller-supplied base URL.
//!
//! Uploads arrive as an [`UploadRequest`], the typed result of decoding a transport
//! request. The store never sees raw request objects.

use crate::config::CoreConfig;
use crate::constants::DOWNLOAD_ROUTE_PREFIX;
use crate::format::{format_file_size, format_upload_time};
use crate::CoreResult;
use api_shared::Firmware;
use ota_files::{ArtifactMeta, ArtifactStore};
use std::sync::Arc;

/// A decoded upload, ready to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    /// Version label as entered by the user; may be empty
    pub version: String,
    /// Original filename of the uploaded file
    pub filename: String,
    /// File contents
    pub payload: Vec<u8>,
}

/// Firmware operations over the configured artifact directory
///
/// Holds no locks. Calls are blocking filesystem operations; async callers should run them on
/// a blocking thread.
#[derive(Clone, Debug)]
pub struct FirmwareService {
    cfg: Arc<CoreConfig>,
    store: ArtifactStore,
}

impl FirmwareService {
    /// Opens the artifact directory named by the configuration, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or is not a directory.
    pub fn new(cfg: Arc<CoreConfig>) -> CoreResult<Self> {
        let store = ArtifactStore::open(cfg.upload_dir())?;
        tracing::info!("artifact directory: {}", store.root_directory().display());
        Ok(Self { cfg, store })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Lists stored firmware, most recent first.
    pub fn list(&self, base_url: &str) -> CoreResult<Vec<Firmware>> {
        let artifacts = self.store.list()?;
        Ok(artifacts
            .iter()
            .map(|meta| to_firmware(meta, base_url))
            .collect())
    }

    /// Stores an upload and returns the stored firmware as it now exists on disk.
    pub fn upload(&self, request: UploadRequest, base_url: &str) -> CoreResult<Firmware> {
        let meta = self.store.put(
            &request.version,
            &request.filename,
            request.payload.as_slice(),
        )?;
        Ok(to_firmware(&meta, base_url))
    }

    /// Describes a single stored firmware.
    pub fn describe(&self, filename: &str, base_url: &str) -> CoreResult<Firmware> {
        let meta = self.store.meta(filename)?;
        Ok(to_firmware(&meta, base_url))
    }

    /// Reads a stored firmware image.
    pub fn read(&self, filename: &str) -> CoreResult<Vec<u8>> {
        Ok(self.store.get(filename)?)
    }

    /// Deletes a stored firmware image.
    pub fn delete(&self, filename: &str) -> CoreResult<()> {
        Ok(self.store.delete(filename)?)
    }
}

/// Renders artifact metadata for clients.
pub fn to_firmware(meta: &ArtifactMeta, base_url: &str) -> Firmware {
    Firmware {
        filename: meta.id.to_string(),
        version: meta.version.clone(),
        size: meta.size_bytes,
        size_formatted: format_file_size(meta.size_bytes),
        uploaded_at: meta.uploaded_at_millis,
        upload_time: format_upload_time(meta.uploaded_at_millis),
        download_url: download_url(base_url, meta.id.as_str()),
    }
}

/// `<base_url>/firmwares/<filename>`
pub fn download_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}{}/{}",
        base_url.trim_end_matches('/'),
        DOWNLOAD_ROUTE_PREFIX,
        filename
    )
}
