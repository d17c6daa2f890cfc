//! OTA Firmware Storage
//!
//! This crate owns the on-disk repository of firmware images served for over-the-air
//! updates.
//!
//! ## Design Principles
//!
//! - One flat directory; every regular `*.bin` file in it is a managed artifact
//! - The filename is the identifier and encodes `(version, upload time)`
//! - Metadata is never stored, it is derived from the filename and a `stat`
//! - Artifacts are immutable: a new upload is always a new file
//! - No locks: uploads land through a temporary file and one atomic rename
//!
//! ## Storage Layout
//!
//! ```text
//! <upload_dir>/
//! ├── v2.1.0_1718000000000.bin
//! ├── v2.0.9_1717000000000.bin
//! └── .v2.2.0_1719000000000.bin.8c1f….tmp   # upload in flight
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use ota_files::ArtifactStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ArtifactStore::open("uploads")?;
//! let meta = store.put("v2.1.0", "firmware.bin", &b"\x7fELF"[..])?;
//! assert_eq!(store.get(meta.id.as_str())?, b"\x7fELF");
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;
mod naming;

pub use constants::{ARTIFACT_EXTENSION, DEFAULT_VERSION, MAX_PAYLOAD_BYTES, UNKNOWN_VERSION};
pub use files::{ArtifactMeta, ArtifactStore};
pub use naming::{decode, encode, sanitise_version, ArtifactId};

use std::fmt;

/// Store operation during which an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Validating an id outside any store call
    Parse,
    Open,
    Put,
    List,
    Meta,
    Get,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Parse => "parse",
            Operation::Open => "open",
            Operation::Put => "put",
            Operation::List => "list",
            Operation::Meta => "meta",
            Operation::Get => "get",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during artifact operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Upload source filename does not carry the `.bin` extension
    #[error("Invalid extension for '{filename}': only .bin firmware files are accepted")]
    InvalidExtension { filename: String },

    /// Upload contained no bytes
    #[error("Empty payload for version '{version}'")]
    EmptyPayload { version: String },

    /// Upload exceeded the payload limit
    #[error("Payload for version '{version}' exceeds the limit of {limit} bytes")]
    PayloadTooLarge { version: String, limit: u64 },

    /// Caller-supplied id is malformed or unsafe to use as a path component
    #[error("Invalid artifact id during {op}: '{id}'")]
    InvalidId { op: Operation, id: String },

    /// Stored filename does not follow the naming scheme
    #[error("Malformed artifact id '{id}': {reason}")]
    MalformedId { id: String, reason: &'static str },

    /// No artifact with this id exists
    #[error("Artifact not found during {op}: {id}")]
    NotFound { op: Operation, id: String },

    /// Artifact directory exists but cannot be used
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// Any other filesystem failure
    #[error("I/O error during {op} of '{target}': {source}")]
    Io {
        op: Operation,
        target: String,
        #[source]
        source: std::io::Error,
    },
}

impl FilesError {
    pub(crate) fn io(op: Operation, target: impl Into<String>, source: std::io::Error) -> Self {
        FilesError::Io {
            op,
            target: target.into(),
            source,
        }
    }

    pub(crate) fn not_found(op: Operation, id: &ArtifactId) -> Self {
        FilesError::NotFound {
            op,
            id: id.to_string(),
        }
    }
}

/// Result type for artifact operations.
pub type FilesResult<T> = Result<T, FilesError>;
