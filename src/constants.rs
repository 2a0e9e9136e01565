// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants
//!
//! Depth range, threshold, tilt and marker values used across the tools.
//! Most of them only provide defaults; see [`crate::config::Config`].

use std::time::Duration;

/// Default frame geometry of the Kinect depth stream and of raw depth files
pub mod frame {
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 480;

    /// Bytes per depth sample in raw files
    pub const BYTES_PER_SAMPLE: usize = 2;

    /// Bytes per pixel of the rendered RGB image
    pub const RGB_CHANNELS: usize = 3;
}

/// Depth sensor constants (millimeters)
pub mod depth {
    /// Sample value meaning "no reading"
    pub const DEPTH_INVALID_MM: u16 = 0;

    /// Distance that maps to full intensity in the grayscale view
    pub const DEFAULT_SCALE_MM: u16 = 3000;

    /// Maximum 8-bit intensity
    pub const MAX_INTENSITY: u8 = 255;
}

/// Visibility threshold window limits (millimeters)
pub mod threshold {
    pub const DEFAULT_BEGIN_MM: u16 = 500;
    pub const DEFAULT_END_MM: u16 = 1500;

    /// Hard ceiling for the window end
    pub const CEILING_MM: u16 = 4000;

    /// Minimum distance between begin and end
    pub const MIN_SPAN_MM: u16 = 300;

    /// Step applied by the +/- keys
    pub const STEP_MM: i32 = 100;
}

/// Motor tilt limits (degrees)
pub mod tilt {
    pub const MIN_DEGREES: i8 = -31;
    pub const MAX_DEGREES: i8 = 31;

    /// Step applied by the arrow keys
    pub const STEP_DEGREES: i8 = 5;
}

/// Snapshot countdown
pub mod snapshot {
    use super::Duration;

    /// Value the countdown starts from
    pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 3;

    /// Countdown tick period
    pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

    /// File name prefix of saved depth frames
    pub const FILE_PREFIX: &str = "depth-data-";
}

/// Marker overlay
pub mod marker {
    /// Half the side of a marker square
    pub const DEFAULT_RADIUS: u32 = 6;
}

/// Terminal event loop timing
pub mod timing {
    use super::Duration;

    /// Input poll timeout, roughly one frame at 60Hz
    pub const INPUT_POLL: Duration = Duration::from_millis(16);

    /// Default frame rate of the replay sensor
    pub const DEFAULT_REPLAY_FPS: u32 = 30;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 300;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_fits_limits() {
        assert!(threshold::DEFAULT_BEGIN_MM + threshold::MIN_SPAN_MM <= threshold::DEFAULT_END_MM);
        assert!(threshold::DEFAULT_END_MM <= threshold::CEILING_MM);
    }

    #[test]
    fn test_tilt_range_is_symmetric() {
        assert_eq!(tilt::MIN_DEGREES, -tilt::MAX_DEGREES);
    }
}
