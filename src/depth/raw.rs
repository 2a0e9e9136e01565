// SPDX-License-Identifier: GPL-3.0-only

//! Raw depth file format
//!
//! A raw depth file is `width*height` little-endian `u16` samples, row-major,
//! with no header. The dimensions are not stored and must be known by the
//! reader.

use super::DepthBuffer;
use crate::constants::{frame::BYTES_PER_SAMPLE, snapshot::FILE_PREFIX};
use crate::errors::{AppError, AppResult};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl DepthBuffer {
    /// Decode `width*height` little-endian samples
    pub fn from_le_bytes(width: u32, height: u32, bytes: &[u8]) -> AppResult<Self> {
        let expected = frame_bytes(width, height)?;
        if bytes.len() != expected {
            return Err(AppError::invalid(format!(
                "{}x{} depth frame needs {} bytes, got {}",
                width,
                height,
                expected,
                bytes.len()
            )));
        }

        let samples = bytes
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        DepthBuffer::new(width, height, samples)
    }

    /// Encode as little-endian samples
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples()
            .iter()
            .flat_map(|sample| sample.to_le_bytes())
            .collect()
    }
}

/// Size in bytes of one `width × height` frame
pub fn frame_bytes(width: u32, height: u32) -> AppResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|samples| samples.checked_mul(BYTES_PER_SAMPLE))
        .ok_or_else(|| {
            AppError::invalid(format!("{}x{} depth frame is too large", width, height))
        })
}

/// Read exactly one `width × height` frame from `path`
///
/// A file shorter than a frame is an error. Extra trailing bytes are ignored.
pub fn read_raw_depth(path: impl AsRef<Path>, width: u32, height: u32) -> AppResult<DepthBuffer> {
    let path = path.as_ref();
    let expected = frame_bytes(width, height)?;

    let mut file = File::open(path).map_err(|e| AppError::io(path, e))?;
    let mut bytes = vec![0u8; expected];
    file.read_exact(&mut bytes)
        .map_err(|e| AppError::io(path, e))?;

    if let Ok(metadata) = file.metadata()
        && metadata.len() > expected as u64
    {
        debug!(
            path = %path.display(),
            extra = metadata.len() - expected as u64,
            "Ignoring trailing bytes after depth frame"
        );
    }

    DepthBuffer::from_le_bytes(width, height, &bytes)
}

/// Write one frame to `path`, replacing any existing file
pub fn write_raw_depth(path: impl AsRef<Path>, buffer: &DepthBuffer) -> AppResult<()> {
    let path = path.as_ref();
    std::fs::write(path, buffer.to_le_bytes()).map_err(|e| AppError::io(path, e))?;
    info!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "Depth frame written"
    );
    Ok(())
}

/// Snapshot file for a capture taken at `timestamp_micros`
pub fn snapshot_path(dir: impl AsRef<Path>, timestamp_micros: i64) -> PathBuf {
    dir.as_ref()
        .join(format!("{}{}", FILE_PREFIX, timestamp_micros))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let buffer = DepthBuffer::new(2, 1, vec![0x0102, 0xA0B0]).unwrap();
        assert_eq!(buffer.to_le_bytes(), vec![0x02, 0x01, 0xB0, 0xA0]);
    }

    #[test]
    fn test_from_le_bytes_rejects_wrong_size() {
        assert!(DepthBuffer::from_le_bytes(2, 2, &[0; 7]).is_err());
        assert!(DepthBuffer::from_le_bytes(2, 2, &[0; 8]).is_ok());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        assert_eq!(frame_bytes(640, 480).unwrap(), 614_400);
        assert!(matches!(
            frame_bytes(u32::MAX, u32::MAX),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(DepthBuffer::from_le_bytes(u32::MAX, u32::MAX, &[]).is_err());

        // Checked before the file is even opened
        let err = read_raw_depth("/nonexistent/depth", u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_short_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short");
        std::fs::write(&path, [0u8; 10]).unwrap();

        let err = read_raw_depth(&path, 4, 4).unwrap_err();
        assert!(matches!(err, AppError::IoFailure { .. }));
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_raw_depth(dir.path().join("missing"), 4, 4).unwrap_err();
        assert!(matches!(err, AppError::IoFailure { .. }));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long");
        let mut bytes = DepthBuffer::new(2, 2, vec![1, 2, 3, 4]).unwrap().to_le_bytes();
        bytes.extend_from_slice(&[9, 9, 9]);
        std::fs::write(&path, bytes).unwrap();

        let buffer = read_raw_depth(&path, 2, 2).unwrap();
        assert_eq!(buffer.samples(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_snapshot_name() {
        let path = snapshot_path("/tmp/shots", 1_700_000_000_123_456);
        assert_eq!(
            path,
            PathBuf::from("/tmp/shots/depth-data-1700000000123456")
        );
    }
}
