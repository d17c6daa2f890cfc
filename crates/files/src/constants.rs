//! Constants shared by the naming scheme and the store.

/// Extension carried by every managed artifact, including the leading dot.
pub const ARTIFACT_EXTENSION: &str = ".bin";

/// Version label substituted when an upload does not provide one.
pub const DEFAULT_VERSION: &str = "v1.0.0";

/// Version reported for artifacts whose filename has no version segment.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Largest accepted payload (50 MiB).
pub const MAX_PAYLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Suffix of in-flight upload files. These never match `*.bin`, so listings skip them.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";
