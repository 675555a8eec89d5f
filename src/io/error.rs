//! Error types for mosaic jobs and per-image decode failures

use crate::render::job::JobState;
use std::fmt;
use std::path::PathBuf;

/// Why a single image could not be turned into pixels
#[derive(Debug)]
pub enum DecodeErrorKind {
    /// The file could not be read
    Io(std::io::Error),
    /// No decoder in the chain recognised the data
    Unrecognized,
    /// A decoder recognised the data but failed to decode it
    Malformed(image::ImageError),
}

/// A single unreadable image
///
/// Recoverable: the profiler omits the image, the compositor substitutes a
/// black tile. Only job fatal when wrapped as [`MosaicError::InvalidTarget`].
#[derive(Debug)]
pub struct DecodeError {
    /// Path or identifier of the offending image
    pub origin: PathBuf,
    /// What went wrong
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    /// Create a decode error for the given origin
    pub fn new(origin: impl Into<PathBuf>, kind: DecodeErrorKind) -> Self {
        Self {
            origin: origin.into(),
            kind,
        }
    }

    /// Replace the origin, keeping the failure kind
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = origin.into();
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = self.origin.display();
        match &self.kind {
            DecodeErrorKind::Io(source) => write!(f, "Failed to read image '{origin}': {source}"),
            DecodeErrorKind::Unrecognized => {
                write!(f, "Unrecognized image format for '{origin}'")
            }
            DecodeErrorKind::Malformed(source) => {
                write!(f, "Failed to decode image '{origin}': {source}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            DecodeErrorKind::Io(source) => Some(source),
            DecodeErrorKind::Malformed(source) => Some(source),
            DecodeErrorKind::Unrecognized => None,
        }
    }
}

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Spatial index requested over a catalog with no entries
    EmptyCatalog,

    /// Target image could not be decoded
    InvalidTarget {
        /// Underlying decode failure
        source: DecodeError,
    },

    /// Dimension or size parameter out of range
    InvalidDimension {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Rendering attempted before the spatial index was built
    CatalogMissing,

    /// Grid planning produced no cells
    EmptyGrid,

    /// Job aborted through its cancel token
    Cancelled,

    /// Job step invoked from a state that does not permit it
    InvalidTransition {
        /// State the job was in
        from: JobState,
        /// State the step would have entered
        to: JobState,
    },

    /// Two catalog entries share an image identifier
    DuplicateIdentifier {
        /// The repeated identifier
        identifier: String,
    },

    /// Catalog file content could not be parsed
    CatalogFormat {
        /// Catalog file path
        path: PathBuf,
        /// One-based line number of the offending row
        line: usize,
        /// Description of the problem
        reason: String,
    },

    /// Failed to save the mosaic to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Worker pool could not be created
    ThreadPool {
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "Color catalog has no entries"),
            Self::InvalidTarget { source } => write!(f, "Invalid target image: {source}"),
            Self::InvalidDimension {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid dimension '{parameter}' = '{value}': {reason}")
            }
            Self::CatalogMissing => {
                write!(f, "Spatial index has not been built for this job")
            }
            Self::EmptyGrid => write!(f, "Grid planner produced no cells"),
            Self::Cancelled => write!(f, "Mosaic job was cancelled"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid job transition from {from} to {to}")
            }
            Self::DuplicateIdentifier { identifier } => {
                write!(f, "Duplicate image identifier '{identifier}' in catalog")
            }
            Self::CatalogFormat { path, line, reason } => {
                write!(
                    f,
                    "Malformed catalog '{}' at line {line}: {reason}",
                    path.display()
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::ThreadPool { reason } => write!(f, "Failed to build worker pool: {reason}"),
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidTarget { source } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Create an invalid dimension error
pub fn invalid_dimension(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidDimension {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path and operation
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> MosaicError {
    let path = path.into();
    move |source| MosaicError::FileSystem {
        path,
        operation,
        source,
    }
}
