// SPDX-License-Identifier: GPL-3.0-only

//! Depth to grayscale mapping
//!
//! A sample `v` becomes intensity `round(v * 256 / scale)`, saturating at 255,
//! so near surfaces are dark and far ones fade towards the white background.
//! Zero samples carry no reading and are never painted.

use super::{DepthBuffer, GrayscaleImage, ReducedBuffer};
use crate::constants::depth::{DEFAULT_SCALE_MM, DEPTH_INVALID_MM, MAX_INTENSITY};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// How valid cells of a reduced buffer are painted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    /// Intensity proportional to distance
    #[default]
    Distance,
    /// Solid black for anything inside the threshold window
    Silhouette,
}

/// Fixed-scale distance to intensity mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayscaleMapping {
    scale_mm: u16,
}

impl GrayscaleMapping {
    /// `scale_mm` is the distance that maps to full intensity
    pub fn new(scale_mm: u16) -> AppResult<Self> {
        if scale_mm == 0 {
            return Err(AppError::invalid("depth scale must be non-zero"));
        }
        Ok(Self { scale_mm })
    }

    /// Intensity for a sample, `None` when the sample carries no reading
    pub fn intensity(&self, value: u16) -> Option<u8> {
        if value == DEPTH_INVALID_MM {
            return None;
        }

        // round(v * 256 / S) with halves rounding up, in integers
        let scale = self.scale_mm as u32;
        let rounded = (value as u32 * 512 + scale) / (2 * scale);
        Some(rounded.min(MAX_INTENSITY as u32) as u8)
    }

    /// Paint the sample at `(x, y)`, leaving the background for no-reading samples
    pub fn paint(&self, image: &mut GrayscaleImage, x: u32, y: u32, value: u16) {
        if let Some(intensity) = self.intensity(value) {
            image.set_gray(x, y, intensity);
        }
    }
}

impl Default for GrayscaleMapping {
    fn default() -> Self {
        Self {
            scale_mm: DEFAULT_SCALE_MM,
        }
    }
}

/// Map every sample of a full-resolution buffer 1:1 onto a white image
pub fn render(buffer: &DepthBuffer, mapping: &GrayscaleMapping) -> GrayscaleImage {
    let mut image = GrayscaleImage::blank(buffer.width(), buffer.height());

    for (index, &value) in buffer.samples().iter().enumerate() {
        let x = (index % buffer.width() as usize) as u32;
        let y = (index / buffer.width() as usize) as u32;
        mapping.paint(&mut image, x, y, value);
    }

    image
}

/// Expand a reduced buffer back to its source resolution
///
/// Each valid cell `(i, j)` paints only pixel `(i*f, j*f)`, the top-left
/// corner of its `f×f` block; the rest of the block stays background. With
/// `f == 1` this is the same as [`render`] of the gated buffer.
pub fn synthesize(
    reduced: &ReducedBuffer,
    mapping: &GrayscaleMapping,
    shading: Shading,
) -> GrayscaleImage {
    let (width, height) = reduced.source_size();
    let factor = reduced.factor();
    let mut image = GrayscaleImage::blank(width, height);

    for j in 0..reduced.height() {
        for i in 0..reduced.width() {
            let value = reduced.get(i, j);
            if value == DEPTH_INVALID_MM {
                continue;
            }

            let (x, y) = (i * factor, j * factor);
            match shading {
                Shading::Distance => mapping.paint(&mut image, x, y, value),
                Shading::Silhouette => image.set_gray(x, y, 0),
            }
        }
    }

    image
}
