//! Crate-level error types.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::scene::SceneError;

/// Errors produced by the molviz crate.
#[derive(Debug)]
pub enum MolVizError {
    /// A frame file or source directory does not exist.
    NotFound(PathBuf),
    /// A frame file has a malformed record.
    DataFormat {
        /// File the record came from.
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        details: String,
    },
    /// The host scene refused to create an object, mesh, or material.
    ResourceExhaustion(SceneError),
    /// Any other I/O failure while reading a path.
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A species name clashes with a scene object the visualization does
    /// not own for that species (the container, a shape template, or a
    /// foreign object).
    NameCollision {
        /// Species named in the frame.
        species: String,
        /// Scene object name it clashes with.
        object: String,
    },
    /// Rejected start/stop/step configuration.
    InvalidRange(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl MolVizError {
    /// Build a [`MolVizError::DataFormat`] for `path` at `line`.
    pub fn data_format(
        path: &Path,
        line: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::DataFormat {
            path: path.to_path_buf(),
            line,
            details: details.into(),
        }
    }

    /// Classify an I/O error raised while reading `path`.
    ///
    /// `NotFound` gets its own variant so callers can tell a missing
    /// frame from an unreadable one.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl fmt::Display for MolVizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "file not found: {}", path.display())
            }
            Self::DataFormat {
                path,
                line,
                details,
            } => write!(
                f,
                "invalid data in {} (line {line}): {details}",
                path.display()
            ),
            Self::ResourceExhaustion(e) => {
                write!(f, "scene resource error: {e}")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            Self::NameCollision { species, object } => write!(
                f,
                "species '{species}' collides with scene object '{object}'"
            ),
            Self::InvalidRange(msg) => {
                write!(f, "invalid frame range: {msg}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for MolVizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ResourceExhaustion(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SceneError> for MolVizError {
    fn from(e: SceneError) -> Self {
        Self::ResourceExhaustion(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = MolVizError::from_io(
            Path::new("/nope/0001"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, MolVizError::NotFound(ref p) if p == Path::new("/nope/0001")));
    }

    #[test]
    fn other_io_errors_keep_their_source() {
        let err = MolVizError::from_io(
            Path::new("frames"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, MolVizError::Io { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn data_format_message_names_path_and_line() {
        let err =
            MolVizError::data_format(Path::new("f/0002"), 7, "bad float");
        assert_eq!(err.to_string(), "invalid data in f/0002 (line 7): bad float");
    }
}
