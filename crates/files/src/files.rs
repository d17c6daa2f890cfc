//! Filesystem-backed artifact store
//!
//! This module provides [`ArtifactStore`], the only component that reads or writes
//! the artifact directory.
//!
//! # Concurrency
//!
//! The store holds no lock and no in-memory index. It is `Clone + Send + Sync`
//! and every operation is a short sequence of filesystem calls:
//!
//! - `put` streams into a uniquely named temporary file in the same directory and
//!   publishes it with a single `rename`, so readers never see a partial artifact
//!   under its final name
//! - `list` enumerates then stats each entry; entries removed in between are
//!   skipped
//! - `get` and `delete` race at the filesystem level; the loser sees `NotFound`
//!
//! Two uploads of the same sanitised version within the same millisecond resolve to
//! the same id and the later rename replaces the earlier file. That window is
//! accepted rather than disambiguated, since the id format is observable.

use crate::constants::{MAX_PAYLOAD_BYTES, TEMP_FILE_SUFFIX};
use crate::naming::{encode, ArtifactId};
use crate::{FilesError, FilesResult, Operation, ARTIFACT_EXTENSION};
use chrono::{DateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Metadata derived for a stored artifact
///
/// Never persisted: computed from the filename and a `stat` each time it is
/// requested, so it always reflects what is on disk.
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
pub struct ArtifactMeta {
    /// Filename inside the artifact directory
    pub id: ArtifactId,

    /// Version label recovered from the filename (lossy, see [`crate::decode`])
    pub version: String,

    /// Size of the stored file in bytes
    pub size_bytes: u64,

    /// Upload time in milliseconds since the Unix epoch
    pub uploaded_at_millis: i64,
}

impl ArtifactMeta {
    /// Upload time as a UTC timestamp, if representable.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.uploaded_at_millis)
    }
}

/// Store for firmware artifacts in a single flat directory
///
/// Constructed once at startup with [`ArtifactStore::open`] and passed to whoever
/// needs it. Cloning is cheap and clones share the same directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// Canonicalised artifact directory
    root_directory: PathBuf,

    /// Largest accepted payload
    max_payload_bytes: u64,
}

impl ArtifactStore {
    /// Opens the artifact directory, creating it if needed
    ///
    /// Creation is idempotent: an existing directory is used as is.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path exists but is not a directory
    /// - the directory cannot be created (I/O)
    /// - the path cannot be canonicalised
    pub fn open(root_directory: impl AsRef<Path>) -> FilesResult<Self> {
        let root_directory = root_directory.as_ref();

        if root_directory.exists() && !root_directory.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        if !root_directory.exists() {
            fs::create_dir_all(root_directory).map_err(|e| {
                FilesError::io(Operation::Open, root_directory.display().to_string(), e)
            })?;
            tracing::info!("created artifact directory {}", root_directory.display());
        }

        let root_directory = root_directory.canonicalize().map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        Ok(Self {
            root_directory,
            max_payload_bytes: MAX_PAYLOAD_BYTES,
        })
    }

    /// Overrides the payload limit (defaults to [`MAX_PAYLOAD_BYTES`]).
    #[must_use]
    pub fn with_max_payload_bytes(mut self, max_payload_bytes: u64) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }

    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    #[must_use]
    pub fn max_payload_bytes(&self) -> u64 {
        self.max_payload_bytes
    }

    /// Stores a new firmware image
    ///
    /// The artifact id is derived from `raw_version` and the current time. The
    /// payload is streamed to a temporary file and renamed into place once fully
    /// written and synced; on any failure the temporary file is removed.
    ///
    /// # Arguments
    ///
    /// * `raw_version` - Version label as supplied by the client (may be empty)
    /// * `filename` - Original filename of the upload, used for the extension check
    /// * `data` - Payload source
    ///
    /// # Returns
    ///
    /// Metadata re-derived from the stored file, so `size_bytes` is the size on disk.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `filename` does not end in `.bin` ([`FilesError::InvalidExtension`])
    /// - the payload is empty ([`FilesError::EmptyPayload`])
    /// - the payload is larger than the limit ([`FilesError::PayloadTooLarge`])
    /// - reading the payload or writing the file fails ([`FilesError::Io`])
    pub fn put<R: Read>(
        &self,
        raw_version: &str,
        filename: &str,
        data: R,
    ) -> FilesResult<ArtifactMeta> {
        if !has_artifact_extension(filename) {
            return Err(FilesError::InvalidExtension {
                filename: filename.to_owned(),
            });
        }

        let id = encode(raw_version, Utc::now().timestamp_millis());

        let mut temp = TempFile::create(&self.root_directory, &id)
            .map_err(|e| FilesError::io(Operation::Put, id.as_str(), e))?;

        // One byte past the limit is enough to tell an oversized payload apart.
        let mut limited = data.take(self.max_payload_bytes.saturating_add(1));
        let written = temp
            .write_from(&mut limited)
            .map_err(|e| FilesError::io(Operation::Put, id.as_str(), e))?;

        if written == 0 {
            return Err(FilesError::EmptyPayload {
                version: raw_version.to_owned(),
            });
        }

        if written > self.max_payload_bytes {
            return Err(FilesError::PayloadTooLarge {
                version: raw_version.to_owned(),
                limit: self.max_payload_bytes,
            });
        }

        temp.persist(&self.artifact_path(&id))
            .map_err(|e| FilesError::io(Operation::Put, id.as_str(), e))?;

        tracing::info!("stored artifact {} ({} bytes)", id, written);

        self.describe(Operation::Put, &id)
    }

    /// Lists all artifacts, most recent upload first
    ///
    /// Ties on the upload time are ordered by id so repeated calls agree.
    ///
    /// A missing directory yields an empty list. Entries that disappear between
    /// enumeration and `stat` are skipped, as are `*.bin` names that do not follow
    /// the naming scheme (logged).
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::Io`] if the directory cannot be enumerated.
    pub fn list(&self) -> FilesResult<Vec<ArtifactMeta>> {
        let entries = match fs::read_dir(&self.root_directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FilesError::io(
                    Operation::List,
                    self.root_directory.display().to_string(),
                    e,
                ))
            }
        };

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                FilesError::io(
                    Operation::List,
                    self.root_directory.display().to_string(),
                    e,
                )
            })?;

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !name.ends_with(ARTIFACT_EXTENSION) {
                continue;
            }

            let id = match ArtifactId::parse_for(Operation::List, name) {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!("skipping unrecognised file in artifact directory: {}", name);
                    continue;
                }
            };

            match self.describe(Operation::List, &id) {
                Ok(meta) => artifacts.push(meta),
                Err(e) => tracing::debug!("skipping artifact {}: {}", id, e),
            }
        }

        artifacts.sort_by(|a, b| {
            b.uploaded_at_millis
                .cmp(&a.uploaded_at_millis)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(artifacts)
    }

    /// Returns metadata for one artifact
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidId`] for unsafe ids, [`FilesError::NotFound`] if
    /// the artifact does not exist, [`FilesError::Io`] otherwise.
    pub fn meta(&self, id: &str) -> FilesResult<ArtifactMeta> {
        let id = ArtifactId::parse_for(Operation::Meta, id)?;
        self.describe(Operation::Meta, &id)
    }

    /// Reads an artifact's bytes
    ///
    /// The id is validated before any path is built from it.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidId`] for unsafe ids, [`FilesError::NotFound`] if
    /// the artifact does not exist, [`FilesError::Io`] otherwise.
    pub fn get(&self, id: &str) -> FilesResult<Vec<u8>> {
        let id = ArtifactId::parse_for(Operation::Get, id)?;
        fs::read(self.artifact_path(&id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FilesError::not_found(Operation::Get, &id),
            _ => FilesError::io(Operation::Get, id.as_str(), e),
        })
    }

    /// Removes an artifact
    ///
    /// Deleting an artifact that does not exist is an error, never a silent success.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidId`] for unsafe ids, [`FilesError::NotFound`] if
    /// the artifact does not exist, [`FilesError::Io`] otherwise.
    pub fn delete(&self, id: &str) -> FilesResult<()> {
        let id = ArtifactId::parse_for(Operation::Delete, id)?;
        fs::remove_file(self.artifact_path(&id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FilesError::not_found(Operation::Delete, &id),
            _ => FilesError::io(Operation::Delete, id.as_str(), e),
        })?;

        tracing::info!("deleted artifact {}", id);
        Ok(())
    }

    /// Builds metadata from a `stat` of the artifact and its decoded name.
    fn describe(&self, op: Operation, id: &ArtifactId) -> FilesResult<ArtifactMeta> {
        let metadata = fs::metadata(self.artifact_path(id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FilesError::not_found(op, id),
            _ => FilesError::io(op, id.as_str(), e),
        })?;

        if !metadata.is_file() {
            return Err(FilesError::not_found(op, id));
        }

        let (version, uploaded_at_millis) = id.decode()?;

        Ok(ArtifactMeta {
            id: id.clone(),
            version,
            size_bytes: metadata.len(),
            uploaded_at_millis,
        })
    }

    fn artifact_path(&self, id: &ArtifactId) -> PathBuf {
        self.root_directory.join(id.as_str())
    }
}

/// Returns true if `filename` ends in `.bin`, ignoring case.
fn has_artifact_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&ARTIFACT_EXTENSION[1..]))
}

/// In-flight upload file that is removed on drop unless persisted.
struct TempFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    persisted: bool,
}

impl TempFile {
    fn create(directory: &Path, id: &ArtifactId) -> io::Result<Self> {
        let nonce: u64 = rand::random();
        let path = directory.join(format!(".{}.{:016x}{}", id, nonce, TEMP_FILE_SUFFIX));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            persisted: false,
        })
    }

    fn write_from<R: Read>(&mut self, reader: &mut R) -> io::Result<u64> {
        match self.writer.as_mut() {
            Some(writer) => io::copy(reader, writer),
            None => Err(io::Error::other("temporary file already closed")),
        }
    }

    /// Flushes, syncs and closes the file, then renames it to `destination`.
    fn persist(mut self, destination: &Path) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }

        fs::rename(&self.path, destination)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        // Close before unlinking.
        self.writer.take();
        if !self.persisted {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!(
                    "failed to remove temporary upload {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Helper to open a store in a fresh temporary directory
    fn create_store(temp: &TempDir) -> ArtifactStore {
        ArtifactStore::open(temp.path().join("uploads")).expect("Failed to open store")
    }

    /// Names of everything in the artifact directory, sorted
    fn dir_entries(store: &ArtifactStore) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(store.root_directory())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("uploads");

        let store = ArtifactStore::open(&root).unwrap();

        assert!(root.is_dir());
        assert!(store.root_directory().ends_with("uploads"));
        assert_eq!(store.max_payload_bytes(), MAX_PAYLOAD_BYTES);
    }

    #[test]
    fn test_open_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("uploads");

        let first = ArtifactStore::open(&root).unwrap();
        first.put("v1", "fw.bin", &b"abc"[..]).unwrap();

        let second = ArtifactStore::open(&root).unwrap();
        assert_eq!(first.root_directory(), second.root_directory());
        assert_eq!(second.list().unwrap().len(), 1);
    }

    #[test]
    fn test_open_rejects_file_path() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("not-a-dir");
        fs::write(&root, "plain file").unwrap();

        let result = ArtifactStore::open(&root);

        assert!(matches!(result, Err(FilesError::InvalidRootDirectory(_))));
    }

    #[test]
    fn test_put_and_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let payload: Vec<u8> = (0..=255).cycle().take(4096).collect();

        let meta = store.put("v2.1.0", "esp32.bin", payload.as_slice()).unwrap();

        assert_eq!(meta.version, "v2.1.0");
        assert_eq!(meta.size_bytes, 4096);
        assert!(meta.id.as_str().starts_with("v2.1.0_"));
        assert!(meta.id.as_str().ends_with(".bin"));
        assert!(meta.uploaded_at().is_some());

        assert_eq!(store.get(meta.id.as_str()).unwrap(), payload);
    }

    #[test]
    fn test_put_empty_version_uses_default() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        let meta = store.put("", "fw.bin", &b"x"[..]).unwrap();

        assert_eq!(meta.version, "v1.0.0");
        assert!(meta.id.as_str().starts_with("v1.0.0_"));
    }

    #[test]
    fn test_put_sanitises_version() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        let meta = store.put("../v1 beta", "fw.bin", &b"x"[..]).unwrap();

        assert!(meta.id.as_str().starts_with(".._v1_beta_"));
        assert_eq!(meta.version, ".._v1_beta");
        assert!(store.root_directory().join(meta.id.as_str()).is_file());
    }

    #[test]
    fn test_put_extension_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        assert!(store.put("v1", "FIRMWARE.BIN", &b"x"[..]).is_ok());
    }

    #[test]
    fn test_put_rejects_other_extensions() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        for filename in ["fw.hex", "fw.bin.exe", "fw", ".bin", ""] {
            let result = store.put("v1", filename, &b"x"[..]);
            assert!(
                matches!(result, Err(FilesError::InvalidExtension { .. })),
                "{:?} should be rejected",
                filename
            );
        }
        assert!(dir_entries(&store).is_empty());
    }

    #[test]
    fn test_put_rejects_empty_payload() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        let result = store.put("v1", "fw.bin", io::empty());

        assert!(matches!(result, Err(FilesError::EmptyPayload { .. })));
        assert!(dir_entries(&store).is_empty(), "temporary file left behind");
    }

    #[test]
    fn test_put_limit_boundary_with_small_limit() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp).with_max_payload_bytes(8);

        let ok = store.put("v1", "fw.bin", &[7u8; 8][..]).unwrap();
        assert_eq!(ok.size_bytes, 8);

        let too_big = store.put("v2", "fw.bin", &[7u8; 9][..]);
        match too_big {
            Err(FilesError::PayloadTooLarge { version, limit }) => {
                assert_eq!(version, "v2");
                assert_eq!(limit, 8);
            }
            other => panic!("expected PayloadTooLarge, got {:?}", other),
        }

        assert_eq!(dir_entries(&store), vec![ok.id.to_string()]);
    }

    #[test]
    fn test_put_limit_boundary_at_fifty_mebibytes() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let limit = MAX_PAYLOAD_BYTES as usize;

        let exact = vec![0xA5u8; limit];
        let meta = store.put("max", "fw.bin", exact.as_slice()).unwrap();
        assert_eq!(meta.size_bytes, MAX_PAYLOAD_BYTES);
        drop(exact);

        let over = io::repeat(0x5A).take(MAX_PAYLOAD_BYTES + 1);
        let result = store.put("over", "fw.bin", over);
        assert!(matches!(result, Err(FilesError::PayloadTooLarge { .. })));

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(dir_entries(&store).len(), 1);
    }

    #[test]
    fn test_put_read_failure_cleans_up() {
        struct FailingReader {
            sent: bool,
        }

        impl Read for FailingReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.sent {
                    return Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away"));
                }
                self.sent = true;
                buf[0] = 1;
                Ok(1)
            }
        }

        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        let result = store.put("v1", "fw.bin", FailingReader { sent: false });

        assert!(matches!(
            result,
            Err(FilesError::Io {
                op: Operation::Put,
                ..
            })
        ));
        assert!(dir_entries(&store).is_empty(), "temporary file left behind");
    }

    #[test]
    fn test_list_empty_directory() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        fs::remove_dir(store.root_directory()).unwrap();

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let root = store.root_directory();

        fs::write(root.join("v1_1000.bin"), b"a").unwrap();
        fs::write(root.join("v3_3000.bin"), b"ccc").unwrap();
        fs::write(root.join("v2_2000.bin"), b"bb").unwrap();

        let listed = store.list().unwrap();
        let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();

        assert_eq!(ids, vec!["v3_3000.bin", "v2_2000.bin", "v1_1000.bin"]);
        assert_eq!(listed[0].size_bytes, 3);
        assert_eq!(listed[0].version, "v3");
        assert_eq!(listed[2].uploaded_at_millis, 1000);
    }

    #[test]
    fn test_list_ties_are_ordered_by_id() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let root = store.root_directory();

        fs::write(root.join("beta_5000.bin"), b"b").unwrap();
        fs::write(root.join("alpha_5000.bin"), b"a").unwrap();
        fs::write(root.join("gamma_4000.bin"), b"g").unwrap();

        for _ in 0..3 {
            let ids: Vec<String> = store
                .list()
                .unwrap()
                .into_iter()
                .map(|m| m.id.to_string())
                .collect();
            assert_eq!(ids, vec!["alpha_5000.bin", "beta_5000.bin", "gamma_4000.bin"]);
        }
    }

    #[test]
    fn test_list_skips_foreign_entries() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let root = store.root_directory();

        fs::write(root.join("README.txt"), b"notes").unwrap();
        fs::write(root.join("not-a-timestamp_abc.bin"), b"x").unwrap();
        fs::write(root.join(".v1_1.bin.0000000000000001.tmp"), b"partial").unwrap();
        fs::create_dir(root.join("dir_123.bin")).unwrap();
        fs::write(root.join("v1_1.bin"), b"ok").unwrap();

        let listed = store.list().unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), "v1_1.bin");
    }

    #[test]
    fn test_list_reports_version_unknown_without_segment() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        fs::write(store.root_directory().join("1700000000000.bin"), b"x").unwrap();

        let listed = store.list().unwrap();

        assert_eq!(listed[0].version, "unknown");
        assert_eq!(listed[0].uploaded_at_millis, 1_700_000_000_000);
    }

    #[test]
    fn test_get_not_found() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        let result = store.get("v9_123.bin");

        assert!(matches!(
            result,
            Err(FilesError::NotFound { op: Operation::Get, id }) if id == "v9_123.bin"
        ));
    }

    #[test]
    fn test_path_traversal_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let outside = temp.path().join("b.bin");
        fs::write(&outside, b"outside").unwrap();

        assert!(matches!(
            store.get("../../etc/passwd"),
            Err(FilesError::InvalidId { op: Operation::Get, .. })
        ));
        assert!(matches!(
            store.delete("a/../b.bin"),
            Err(FilesError::InvalidId { op: Operation::Delete, .. })
        ));
        assert!(matches!(
            store.delete("../b.bin"),
            Err(FilesError::InvalidId { op: Operation::Delete, id }) if id == "../b.bin"
        ));
        assert!(matches!(
            store.meta(".."),
            Err(FilesError::InvalidId { op: Operation::Meta, .. })
        ));

        assert!(outside.exists());
    }

    #[test]
    fn test_dot_dot_inside_a_component_stays_in_root() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let outside = temp.path().join("etc_1.bin");
        fs::write(&outside, b"outside").unwrap();
        fs::write(store.root_directory().join(".._etc_1.bin"), b"inside").unwrap();

        let id = ArtifactId::parse(".._etc_1.bin").unwrap();
        assert_eq!(store.artifact_path(&id).parent(), Some(store.root_directory()));

        assert_eq!(store.get(".._etc_1.bin").unwrap(), b"inside");
        store.delete(".._etc_1.bin").unwrap();
        assert!(matches!(
            store.delete(".._etc_1.bin"),
            Err(FilesError::NotFound { .. })
        ));
        assert_eq!(fs::read(&outside).unwrap(), b"outside");

        let meta = store.put("1..2", "fw.bin", &b"x"[..]).unwrap();
        assert!(meta.id.as_str().starts_with("1..2_"));
        assert_eq!(store.get(meta.id.as_str()).unwrap(), b"x");
    }

    #[test]
    fn test_delete_is_terminal() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let meta = store.put("v1", "fw.bin", &b"bytes"[..]).unwrap();
        let id = meta.id.as_str();

        store.delete(id).unwrap();

        assert!(matches!(
            store.get(id),
            Err(FilesError::NotFound { op: Operation::Get, .. })
        ));
        assert!(matches!(
            store.delete(id),
            Err(FilesError::NotFound { op: Operation::Delete, .. })
        ));
        assert!(matches!(
            store.meta(id),
            Err(FilesError::NotFound { op: Operation::Meta, .. })
        ));
        assert_ne!(
            store.get(id).unwrap_err().to_string(),
            store.delete(id).unwrap_err().to_string()
        );
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_meta_matches_put_result() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        let meta = store.put("rc-1", "fw.bin", Cursor::new(vec![1u8; 10])).unwrap();

        assert_eq!(store.meta(meta.id.as_str()).unwrap(), meta);
    }

    #[test]
    fn test_concurrent_puts_with_distinct_versions() {
        const N: usize = 16;

        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);

        let results: Vec<ArtifactMeta> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..N)
                .map(|i| {
                    let store = store.clone();
                    scope.spawn(move || {
                        let payload = vec![i as u8; 100 + i];
                        store
                            .put(&format!("v{}", i), "fw.bin", payload.as_slice())
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let ids: HashSet<_> = results.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids.len(), N);

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), N);
        for meta in &listed {
            let i: usize = meta.version[1..].parse().unwrap();
            assert_eq!(meta.size_bytes, (100 + i) as u64);
            assert_eq!(store.get(meta.id.as_str()).unwrap(), vec![i as u8; 100 + i]);
        }

        assert_eq!(dir_entries(&store).len(), N, "temporary files left behind");
    }

    #[test]
    fn test_concurrent_list_and_delete() {
        let temp = TempDir::new().unwrap();
        let store = create_store(&temp);
        for i in 0..32 {
            fs::write(store.root_directory().join(format!("v{}_{}.bin", i, i)), b"x").unwrap();
        }

        std::thread::scope(|scope| {
            let deleter = store.clone();
            scope.spawn(move || {
                for i in 0..32 {
                    deleter.delete(&format!("v{}_{}.bin", i, i)).unwrap();
                }
            });

            for _ in 0..8 {
                let listed = store.list().unwrap();
                assert!(listed.len() <= 32);
            }
        });

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_artifact_meta_serialization() {
        let meta = ArtifactMeta {
            id: ArtifactId::parse("v1_1700000000000.bin").unwrap(),
            version: "v1".into(),
            size_bytes: 1024,
            uploaded_at_millis: 1_700_000_000_000,
        };

        let json = serde_json::to_string(&meta).unwrap();

        assert!(json.contains("\"id\":\"v1_1700000000000.bin\""));
        assert!(json.contains("\"size_bytes\":1024"));
    }
}
