// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame processor
//!
//! Pure transformations from 16-bit depth samples (millimeters) to an 8-bit
//! RGB image suitable for display or storage:
//!
//! ```text
//! DepthBuffer ──downsample──▶ ReducedBuffer ──synthesize──▶ GrayscaleImage ──markers──▶ display
//!      │                                                         ▲
//!      └────────────────────────── render ───────────────────────┘
//! ```
//!
//! Nothing in here knows about sensors or terminals. Buffers are borrowed for
//! the duration of a call and never retained.

pub mod downsample;
pub mod grayscale;
pub mod marker;
pub mod raw;

pub use downsample::downsample;
pub use grayscale::{GrayscaleMapping, Shading, render, synthesize};
pub use marker::{Marker, MarkerSpec, apply_markers, draw_marker, parse_color};
pub use raw::{frame_bytes, read_raw_depth, snapshot_path, write_raw_depth};

use crate::constants::{frame::RGB_CHANNELS, threshold};
use crate::errors::{AppError, AppResult};
use image::{Rgb, RgbImage};

/// Row-major depth samples in millimeters, `0` meaning "no reading"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    samples: Vec<u16>,
}

impl DepthBuffer {
    /// Wrap samples captured at `width × height`
    pub fn new(width: u32, height: u32, samples: Vec<u16>) -> AppResult<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::invalid(format!(
                "depth buffer dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let expected = (width as usize).checked_mul(height as usize);
        if expected != Some(samples.len()) {
            return Err(AppError::invalid(format!(
                "depth buffer of {}x{} needs {} samples, got {}",
                width,
                height,
                width as u64 * height as u64,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Sample at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// Smallest and largest valid (non-zero) sample, if any
    pub fn valid_range(&self) -> Option<(u16, u16)> {
        self.samples
            .iter()
            .copied()
            .filter(|&v| v != 0)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Subsampled, threshold-gated copy of a [`DepthBuffer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedBuffer {
    width: u32,
    height: u32,
    factor: u32,
    source_width: u32,
    source_height: u32,
    samples: Vec<u16>,
}

impl ReducedBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reduction factor the buffer was produced with
    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Dimensions of the buffer this one was reduced from
    pub fn source_size(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.samples[y as usize * self.width as usize + x as usize]
    }
}

/// Range of depth values considered visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdWindow {
    begin: u16,
    end: u16,
}

impl ThresholdWindow {
    pub fn new(begin: u16, end: u16) -> AppResult<Self> {
        if begin >= end {
            return Err(AppError::invalid(format!(
                "threshold begin ({}) must be below end ({})",
                begin, end
            )));
        }
        Ok(Self { begin, end })
    }

    /// Window that lets every sample through
    pub fn unbounded() -> Self {
        Self {
            begin: 0,
            end: u16::MAX,
        }
    }

    pub fn begin(&self) -> u16 {
        self.begin
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: u16) -> bool {
        value >= self.begin && value <= self.end
    }

    /// Move `end` by `delta`, clamped to `[begin + MIN_SPAN_MM, CEILING_MM]`
    ///
    /// Returns whether the window changed.
    pub fn adjust_end(&mut self, delta: i32) -> bool {
        let lower = self.begin as i32 + threshold::MIN_SPAN_MM as i32;
        let upper = threshold::CEILING_MM as i32;
        if lower > upper {
            // begin is too close to the ceiling to leave any room
            return false;
        }

        let new_end = (self.end as i32 + delta).clamp(lower, upper) as u16;
        let changed = new_end != self.end;
        self.end = new_end;
        changed
    }
}

impl Default for ThresholdWindow {
    fn default() -> Self {
        Self {
            begin: threshold::DEFAULT_BEGIN_MM,
            end: threshold::DEFAULT_END_MM,
        }
    }
}

/// Background color of rendered depth images
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// 8-bit RGB rendering of a depth frame
///
/// Channels are equal everywhere except under markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleImage(RgbImage);

impl GrayscaleImage {
    /// All-white image
    pub fn blank(width: u32, height: u32) -> Self {
        Self(RgbImage::from_pixel(width, height, BACKGROUND))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Packed `width × height × 3` bytes
    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.0.get_pixel(x, y).0
    }

    /// Paint one pixel with an equal-channel intensity
    pub fn set_gray(&mut self, x: u32, y: u32, value: u8) {
        self.set_color(x, y, Rgb([value; RGB_CHANNELS]));
    }

    pub fn set_color(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        self.0.put_pixel(x, y, color);
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.0
    }

    /// Encode to PNG (or any format implied by the extension)
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> AppResult<()> {
        self.0.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_buffer_rejects_wrong_length() {
        assert!(DepthBuffer::new(4, 4, vec![0; 15]).is_err());
        assert!(DepthBuffer::new(0, 4, vec![]).is_err());
        assert!(DepthBuffer::new(4, 4, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_depth_buffer_row_major() {
        let buffer = DepthBuffer::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(buffer.get(0, 0), 1);
        assert_eq!(buffer.get(2, 0), 3);
        assert_eq!(buffer.get(0, 1), 4);
        assert_eq!(buffer.get(2, 1), 6);
    }

    #[test]
    fn test_valid_range_skips_zero() {
        let buffer = DepthBuffer::new(2, 2, vec![0, 900, 0, 1200]).unwrap();
        assert_eq!(buffer.valid_range(), Some((900, 1200)));

        let empty = DepthBuffer::new(2, 1, vec![0, 0]).unwrap();
        assert_eq!(empty.valid_range(), None);
    }

    #[test]
    fn test_threshold_window_requires_order() {
        assert!(ThresholdWindow::new(500, 500).is_err());
        assert!(ThresholdWindow::new(900, 500).is_err());
        assert!(ThresholdWindow::new(500, 900).is_ok());
    }

    #[test]
    fn test_threshold_contains_is_inclusive() {
        let window = ThresholdWindow::new(500, 1500).unwrap();
        assert!(window.contains(500));
        assert!(window.contains(1500));
        assert!(!window.contains(499));
        assert!(!window.contains(1501));
    }

    #[test]
    fn test_adjust_end_clamps() {
        let mut window = ThresholdWindow::default();
        assert!(window.adjust_end(100));
        assert_eq!(window.end(), 1600);

        // Can't go below begin + 300
        for _ in 0..20 {
            window.adjust_end(-100);
        }
        assert_eq!(window.end(), 800);
        assert!(!window.adjust_end(-100));

        // Can't exceed the ceiling
        for _ in 0..40 {
            window.adjust_end(100);
        }
        assert_eq!(window.end(), 4000);
        assert!(!window.adjust_end(100));
    }

    #[test]
    fn test_adjust_end_with_no_room() {
        let mut window = ThresholdWindow::new(3800, 3900).unwrap();
        assert!(!window.adjust_end(100));
        assert_eq!(window.end(), 3900);
        assert!(window.begin() < window.end());
    }

    #[test]
    fn test_blank_image_is_white() {
        let image = GrayscaleImage::blank(4, 3);
        assert_eq!(image.as_raw().len(), 4 * 3 * 3);
        assert!(image.as_raw().iter().all(|&b| b == 255));
    }
}
