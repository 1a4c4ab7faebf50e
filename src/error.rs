//! Error types for background removal operations

use std::path::Path;
use thiserror::Error;

/// Result type alias for background removal operations
pub type Result<T> = std::result::Result<T, BgRemovalError>;

/// Error types for background removal operations
#[derive(Error, Debug)]
pub enum BgRemovalError {
    /// Input/output errors (permission denied, disk full, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by the image codec layer
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Requested file or directory does not exist
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// File exists but could not be parsed as an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Backup copy could not be created
    #[error("Backup failed: {0}")]
    Backup(String),

    /// Output could not be encoded or written
    #[error("Encode error: {0}")]
    Encode(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Image cannot be processed (e.g. zero width or height)
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

impl BgRemovalError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new invalid image error
    pub fn invalid_image<S: Into<String>>(msg: S) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Create an input-not-found error for a path
    pub fn input_not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::InputNotFound(format!("'{}' does not exist", path.as_ref().display()))
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<Path>>(operation: &str, path: P, error: &std::io::Error) -> Self {
        Self::Io(std::io::Error::new(
            error.kind(),
            format!(
                "Failed to {} '{}': {}",
                operation,
                path.as_ref().display(),
                error
            ),
        ))
    }

    /// Create a decode error with the offending path and format context
    pub fn decode_error<P: AsRef<Path>>(path: P, detail: &str) -> Self {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        Self::Decode(format!(
            "Failed to load image '{}' (format: {}): {}. Supported formats: PNG, JPEG, BMP, TIFF",
            path.display(),
            extension,
            detail
        ))
    }

    /// Create an encode/write error for an output path
    pub fn encode_error<P: AsRef<Path>>(path: P, detail: &str) -> Self {
        Self::Encode(format!(
            "Failed to save PNG to '{}': {}",
            path.as_ref().display(),
            detail
        ))
    }

    /// Create a backup error for the file being backed up
    pub fn backup_error<P: AsRef<Path>>(path: P, error: &std::io::Error) -> Self {
        Self::Backup(format!(
            "Could not create backup of '{}': {}",
            path.as_ref().display(),
            error
        ))
    }

    /// Whether the error only affects an optional step and processing may continue
    #[must_use]
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, Self::Backup(_))
    }
}
