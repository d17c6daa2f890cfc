//! Artifact naming scheme
//!
//! Every stored firmware image is addressed by its filename, which encodes the
//! version label it was uploaded with and the upload time:
//!
//! ```text
//! <sanitised-version>_<unix-millis>.bin
//! v2.1.0-rc1_1718000000000.bin
//! ```
//!
//! Sanitising replaces every character outside `[A-Za-z0-9._-]` with `_`. This is
//! lossy, and because `_` is also the separator the decoded version is only exact
//! for labels that never contained an underscore. Both properties are part of the
//! on-disk format and must not be "fixed" without migrating existing filenames.

use crate::constants::{ARTIFACT_EXTENSION, DEFAULT_VERSION, UNKNOWN_VERSION};
use crate::{FilesError, FilesResult, Operation};
use std::fmt;

/// Returns true for characters allowed verbatim in an artifact filename.
fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
///
/// An empty label is replaced by [`DEFAULT_VERSION`] first.
pub fn sanitise_version(raw_version: &str) -> String {
    let version = if raw_version.is_empty() {
        DEFAULT_VERSION
    } else {
        raw_version
    };

    version
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .collect()
}

/// Builds the artifact id for a version uploaded at `timestamp_millis`.
///
/// Two calls with different timestamps never produce the same id. Two calls for
/// the same sanitised version within the same millisecond do, and the later
/// write replaces the earlier one.
pub fn encode(raw_version: &str, timestamp_millis: i64) -> ArtifactId {
    ArtifactId(format!(
        "{}_{}{}",
        sanitise_version(raw_version),
        timestamp_millis,
        ARTIFACT_EXTENSION
    ))
}

/// Splits an artifact filename back into `(version, timestamp_millis)`.
///
/// # Errors
///
/// Returns [`FilesError::MalformedId`] if the name does not end in `.bin` or the
/// segment after the last `_` is not a base-10 integer (an optional leading `-`
/// is allowed, a leading `+` is not).
pub fn decode(id: &str) -> FilesResult<(String, i64)> {
    let stem = id
        .strip_suffix(ARTIFACT_EXTENSION)
        .ok_or_else(|| FilesError::MalformedId {
            id: id.to_owned(),
            reason: "missing .bin extension",
        })?;

    let (version, timestamp) = match stem.rsplit_once('_') {
        Some((version, timestamp)) => (version, timestamp),
        None => ("", stem),
    };

    let digits = timestamp.strip_prefix('-').unwrap_or(timestamp);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FilesError::MalformedId {
            id: id.to_owned(),
            reason: "timestamp segment is not a decimal integer",
        });
    }

    let timestamp_millis = timestamp
        .parse::<i64>()
        .map_err(|_| FilesError::MalformedId {
            id: id.to_owned(),
            reason: "timestamp segment is out of range",
        })?;

    let version = if version.is_empty() {
        UNKNOWN_VERSION.to_owned()
    } else {
        version.to_owned()
    };

    Ok((version, timestamp_millis))
}

/// A validated artifact filename.
///
/// Holding an `ArtifactId` means the value is safe to join onto the artifact
/// directory: it is a single path component made only of `[A-Za-z0-9._-]`, it is
/// not `.` or `..`, and it decodes as `<version>_<millis>.bin`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Validates an externally supplied id (URL segment, CLI argument, directory entry).
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidId`] if the input is empty, contains a path
    /// separator or any other disallowed character, is a relative path component,
    /// or does not follow the naming scheme.
    pub fn parse(input: &str) -> FilesResult<Self> {
        Self::parse_for(Operation::Parse, input)
    }

    /// Same as [`ArtifactId::parse`], tagging a rejection with the store operation.
    pub(crate) fn parse_for(op: Operation, input: &str) -> FilesResult<Self> {
        if input.is_empty()
            || input == "."
            || input == ".."
            || !input.chars().all(is_safe_char)
            || decode(input).is_err()
        {
            return Err(FilesError::InvalidId {
                op,
                id: input.to_owned(),
            });
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decoded `(version, timestamp_millis)` for this id.
    pub fn decode(&self) -> FilesResult<(String, i64)> {
        decode(&self.0)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ArtifactId {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactId::parse(s)
    }
}

impl serde::Serialize for ArtifactId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ArtifactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ArtifactId::parse(&s).map_err(serde::de::Error::custom)
    }
}
