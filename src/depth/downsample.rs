// SPDX-License-Identifier: GPL-3.0-only

//! Nearest-neighbor downsampling with threshold gating

use super::{DepthBuffer, ReducedBuffer, ThresholdWindow};
use crate::constants::depth::DEPTH_INVALID_MM;
use crate::errors::{AppError, AppResult};

/// Reduce `source` by `factor`, zeroing samples outside `window`
///
/// Cell `(i, j)` of the result is the source sample at `(i*factor, j*factor)`.
/// The output is `⌊width/factor⌋ × ⌊height/factor⌋`: trailing rows and columns
/// that don't fill a whole block are dropped.
pub fn downsample(
    source: &DepthBuffer,
    factor: u32,
    window: ThresholdWindow,
) -> AppResult<ReducedBuffer> {
    if factor == 0 {
        return Err(AppError::invalid("reduction factor must be at least 1"));
    }

    let width = source.width() / factor;
    let height = source.height() / factor;

    let mut samples = Vec::with_capacity(width as usize * height as usize);
    for j in 0..height {
        for i in 0..width {
            let value = source.get(i * factor, j * factor);
            samples.push(if window.contains(value) {
                value
            } else {
                DEPTH_INVALID_MM
            });
        }
    }

    Ok(ReducedBuffer {
        width,
        height,
        factor,
        source_width: source.width(),
        source_height: source.height(),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32) -> DepthBuffer {
        let samples = (0..width * height).map(|i| (i * 10) as u16).collect();
        DepthBuffer::new(width, height, samples).unwrap()
    }

    #[test]
    fn test_truncates_partial_blocks() {
        let buffer = ramp(10, 10);
        let reduced = downsample(&buffer, 3, ThresholdWindow::unbounded()).unwrap();
        assert_eq!(reduced.width(), 3);
        assert_eq!(reduced.height(), 3);
        assert_eq!(reduced.samples().len(), 9);
        assert_eq!(reduced.source_size(), (10, 10));
    }

    #[test]
    fn test_samples_block_corners() {
        let buffer = ramp(6, 4);
        let reduced = downsample(&buffer, 2, ThresholdWindow::unbounded()).unwrap();
        // Source index = y * 6 + x, value = index * 10
        assert_eq!(reduced.get(0, 0), 0);
        assert_eq!(reduced.get(1, 0), 20);
        assert_eq!(reduced.get(2, 0), 40);
        assert_eq!(reduced.get(0, 1), 120);
        assert_eq!(reduced.get(2, 1), 160);
    }

    #[test]
    fn test_threshold_gating() {
        let buffer = DepthBuffer::new(1, 1, vec![1000]).unwrap();

        let kept = downsample(&buffer, 1, ThresholdWindow::new(500, 1500).unwrap()).unwrap();
        assert_eq!(kept.samples(), &[1000]);

        let dropped = downsample(&buffer, 1, ThresholdWindow::new(500, 900).unwrap()).unwrap();
        assert_eq!(dropped.samples(), &[0]);
    }

    #[test]
    fn test_below_begin_is_zeroed() {
        let buffer = DepthBuffer::new(3, 1, vec![499, 500, 501]).unwrap();
        let reduced = downsample(&buffer, 1, ThresholdWindow::new(500, 1500).unwrap()).unwrap();
        assert_eq!(reduced.samples(), &[0, 500, 501]);
    }

    #[test]
    fn test_deterministic_and_source_untouched() {
        let buffer = ramp(8, 8);
        let before = buffer.clone();
        let window = ThresholdWindow::new(100, 400).unwrap();

        let a = downsample(&buffer, 2, window).unwrap();
        let b = downsample(&buffer, 2, window).unwrap();
        assert_eq!(a, b);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_zero_factor_is_invalid() {
        let buffer = ramp(4, 4);
        let err = downsample(&buffer, 0, ThresholdWindow::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_factor_larger_than_frame() {
        let buffer = ramp(4, 4);
        let reduced = downsample(&buffer, 5, ThresholdWindow::unbounded()).unwrap();
        assert_eq!(reduced.width(), 0);
        assert_eq!(reduced.height(), 0);
        assert!(reduced.samples().is_empty());
    }
}
