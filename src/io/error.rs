//! Error types and path context for solver operations

use std::fmt;
use std::path::{Path, PathBuf};

const UNKNOWN_PATH: &str = "<unknown>";

/// Main error type for all solver operations
#[derive(Debug)]
pub enum SolverError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Image dimensions or segment settings cannot form a tile grid
    ///
    /// Fatal: raised before any scoring happens.
    Configuration {
        /// Description of the mismatch
        reason: String,
    },

    /// Tile id or grid coordinate outside the valid grid range
    OutOfRange {
        /// What was being converted or looked up
        what: &'static str,
        /// Offending value, rendered for display
        value: String,
        /// Exclusive upper bound, rendered for display
        limit: String,
    },

    /// Pixel access outside the image extent
    OutOfBounds {
        /// Requested x coordinate
        x: u32,
        /// Requested y coordinate
        y: u32,
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },

    /// A tile was offered as its own neighbor
    SelfComparison {
        /// The tile compared against itself
        tile: usize,
    },

    /// Solver parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save the reconstructed image to disk
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

    /// Analysis artifact could not be encoded or decoded
    Serialization {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Persisted analysis does not describe the current image or settings
    ArtifactMismatch {
        /// Which field disagreed and how
        reason: String,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::Configuration { reason } => {
                write!(f, "Invalid configuration: {reason}")
            }
            Self::OutOfRange { what, value, limit } => {
                write!(f, "{what} {value} is out of range (limit: {limit})")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "Pixel ({x}, {y}) is outside the {width}x{height} image"
                )
            }
            Self::SelfComparison { tile } => {
                write!(f, "Tile {tile} cannot be compared against itself")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
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
            Self::Serialization { path, source } => {
                write!(
                    f,
                    "Failed to serialize analysis '{}': {source}",
                    path.display()
                )
            }
            Self::ArtifactMismatch { reason } => {
                write!(f, "Stored analysis does not match input: {reason}")
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for solver results
pub type Result<T> = std::result::Result<T, SolverError>;

/// Attaches a filesystem path to errors that were converted without one
pub trait WithPath<T> {
    /// Replace the placeholder path of path-carrying errors
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<SolverError>,
{
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                SolverError::ImageLoad { path: slot, .. }
                | SolverError::ImageExport { path: slot, .. }
                | SolverError::FileSystem { path: slot, .. }
                | SolverError::Serialization { path: slot, .. }
                    if slot.as_os_str() == UNKNOWN_PATH =>
                {
                    *slot = path.to_path_buf();
                }
                _ => {}
            }
            error
        })
    }
}

impl From<image::ImageError> for SolverError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_PATH),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SolverError {
    SolverError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a configuration error
pub fn configuration_error(reason: &impl ToString) -> SolverError {
    SolverError::Configuration {
        reason: reason.to_string(),
    }
}

/// Create an out-of-range error for an id or coordinate lookup
pub fn out_of_range(
    what: &'static str,
    value: &impl fmt::Debug,
    limit: &impl fmt::Debug,
) -> SolverError {
    SolverError::OutOfRange {
        what,
        value: format!("{value:?}"),
        limit: format!("{limit:?}"),
    }
}
