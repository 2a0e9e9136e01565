// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Read from `--config PATH`, or `$XDG_CONFIG_HOME/depthcam/config.json` when
//! present. Every field is optional; missing ones take the defaults below.
//! Command line flags are applied on top by the caller.

use crate::constants::{depth, frame, marker, snapshot, threshold, timing};
use crate::depth::{GrayscaleMapping, Shading, ThresholdWindow};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file name inside the application config directory
pub const CONFIG_FILE: &str = "config.json";

/// Application directory name under the platform config directory
pub const APP_DIR: &str = "depthcam";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Width of raw depth files and of the expected sensor frames
    pub frame_width: u32,
    /// Height of raw depth files and of the expected sensor frames
    pub frame_height: u32,
    /// Distance (mm) rendered at full intensity
    pub depth_scale_mm: u16,
    /// Lower edge of the visibility window (fixed per session)
    pub threshold_begin_mm: u16,
    /// Initial upper edge of the visibility window
    pub threshold_end_mm: u16,
    /// Value the snapshot countdown starts from
    pub countdown_seconds: u32,
    /// Downsampling factor for the live view (1 = full resolution)
    pub reduction_factor: u32,
    /// How pixels inside the window are painted in the live view
    pub shading: Shading,
    /// Half side of marker squares in the viewer
    pub marker_radius: u32,
    /// Where depth snapshots are written
    pub snapshot_dir: PathBuf,
    /// Sensor index to open
    pub device_index: usize,
    /// Frame rate of `live --replay`
    pub replay_fps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_width: frame::DEFAULT_WIDTH,
            frame_height: frame::DEFAULT_HEIGHT,
            depth_scale_mm: depth::DEFAULT_SCALE_MM,
            threshold_begin_mm: threshold::DEFAULT_BEGIN_MM,
            threshold_end_mm: threshold::DEFAULT_END_MM,
            countdown_seconds: snapshot::DEFAULT_COUNTDOWN_SECONDS,
            reduction_factor: 1,
            shading: Shading::default(),
            marker_radius: marker::DEFAULT_RADIUS,
            snapshot_dir: PathBuf::from("."),
            device_index: 0,
            replay_fps: timing::DEFAULT_REPLAY_FPS,
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location if it exists
    ///
    /// An explicit path must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let config = Self::from_json(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reject values the pipeline can't work with
    pub fn validate(&self) -> AppResult<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(AppError::invalid(format!(
                "frame size must be non-zero, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        if self.reduction_factor == 0 {
            return Err(AppError::invalid("reduction_factor must be at least 1"));
        }
        if self.countdown_seconds == 0 {
            return Err(AppError::invalid("countdown_seconds must be at least 1"));
        }
        if self.replay_fps == 0 {
            return Err(AppError::invalid("replay_fps must be at least 1"));
        }
        if self.threshold_end_mm > threshold::CEILING_MM {
            return Err(AppError::invalid(format!(
                "threshold_end_mm must not exceed {}",
                threshold::CEILING_MM
            )));
        }
        self.threshold_window()?;
        self.mapping()?;
        Ok(())
    }

    pub fn threshold_window(&self) -> AppResult<ThresholdWindow> {
        ThresholdWindow::new(self.threshold_begin_mm, self.threshold_end_mm)
    }

    pub fn mapping(&self) -> AppResult<GrayscaleMapping> {
        GrayscaleMapping::new(self.depth_scale_mm)
    }
}
