// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the depth tools

use std::path::{Path, PathBuf};

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// File open/read/write errors
    #[error("I/O error on {}: {source}", path.display())]
    IoFailure {
        /// File the operation was working on
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad dimensions, malformed colors, wrong argument counts, zero factors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Sensor connect/stream/tilt errors surfaced from the device backend
    #[error("Device error: {0}")]
    DeviceFailure(String),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// PNG export failed
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

impl AppError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::IoFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn device(msg: impl Into<String>) -> Self {
        AppError::DeviceFailure(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = AppError::io(
            "/tmp/depth-data-1",
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/depth-data-1"));
        assert!(msg.contains("short read"));
    }

    #[test]
    fn test_helper_variants() {
        assert!(matches!(AppError::invalid("bad color"), AppError::InvalidArgument(_)));
        assert_eq!(
            AppError::device("unplugged").to_string(),
            "Device error: unplugged"
        );
    }
}
