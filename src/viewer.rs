// SPDX-License-Identifier: GPL-3.0-only

//! Still depth image for `depthcam view`
//!
//! Loads a raw depth file, maps it to grayscale and draws the command line
//! markers on top. Marker problems never stop the image from rendering.

use crate::config::Config;
use crate::depth::{GrayscaleImage, MarkerSpec, apply_markers, read_raw_depth, render};
use crate::errors::{AppError, AppResult};
use std::path::Path;
use tracing::{info, warn};

/// Rendered file plus everything that went wrong with its markers
#[derive(Debug)]
pub struct ViewerImage {
    pub image: GrayscaleImage,
    /// Set when the marker arguments weren't `COLOR X Y` triples; no markers were drawn
    pub marker_usage: Option<AppError>,
    /// Markers skipped for a bad color or coordinate
    pub skipped: Vec<AppError>,
}

/// Render `path` and draw the markers given as trailing arguments
///
/// Only loading the file is fatal.
pub fn render_file(config: &Config, path: &Path, marker_args: &[String]) -> AppResult<ViewerImage> {
    let (specs, marker_usage) = match MarkerSpec::from_args(marker_args) {
        Ok(specs) => (specs, None),
        Err(e) => {
            warn!("{}", e);
            (Vec::new(), Some(e))
        }
    };

    let buffer = read_raw_depth(path, config.frame_width, config.frame_height)?;
    if let Some((min, max)) = buffer.valid_range() {
        info!(min, max, "Depth range of file");
    }

    let mut image = render(&buffer, &config.mapping()?);
    let skipped = apply_markers(&mut image, &specs, config.marker_radius);

    Ok(ViewerImage {
        image,
        marker_usage,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::{BACKGROUND, DepthBuffer, write_raw_depth};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn small_config() -> Config {
        Config {
            frame_width: 16,
            frame_height: 16,
            marker_radius: 2,
            ..Config::default()
        }
    }

    #[test]
    fn test_markers_drawn_over_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame");
        write_raw_depth(&path, &DepthBuffer::new(16, 16, vec![1000; 256]).unwrap()).unwrap();

        let viewer = render_file(&small_config(), &path, &args(&["lime", "8", "8"])).unwrap();
        assert!(viewer.marker_usage.is_none());
        assert!(viewer.skipped.is_empty());
        assert_eq!(viewer.image.pixel(8, 8), [0, 255, 0]);
        assert_eq!(viewer.image.pixel(0, 0), [85, 85, 85]);
    }

    #[test]
    fn test_wrong_marker_count_renders_plain_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame");
        write_raw_depth(&path, &DepthBuffer::new(16, 16, vec![0; 256]).unwrap()).unwrap();

        let viewer = render_file(&small_config(), &path, &args(&["red", "1"])).unwrap();
        assert!(matches!(viewer.marker_usage, Some(AppError::InvalidArgument(_))));
        assert!(viewer.image.as_raw().iter().all(|&b| b == BACKGROUND.0[0]));
    }

    #[test]
    fn test_negative_coordinate_skips_one_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame");
        write_raw_depth(&path, &DepthBuffer::new(16, 16, vec![0; 256]).unwrap()).unwrap();

        let marker_args = args(&["red", "10", "-5", "blue", "4", "4"]);
        let viewer = render_file(&small_config(), &path, &marker_args).unwrap();
        assert_eq!(viewer.skipped.len(), 1);
        assert_eq!(viewer.image.pixel(4, 4), [0, 0, 255]);
        assert_eq!(viewer.image.pixel(10, 0), BACKGROUND.0);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_file(&small_config(), &dir.path().join("missing"), &[]);
        assert!(matches!(result, Err(AppError::IoFailure { .. })));
    }
}
