// SPDX-License-Identifier: GPL-3.0-only

//! Depth sensor abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   Session / driver  │
//! └──────────┬──────────┘
//!            │ poll frames, tilt
//!            ▼
//! ┌─────────────────────┐
//! │  DepthSensor trait  │
//! └──────────┬──────────┘
//!       ┌────┴─────┐
//!       ▼          ▼
//!  ┌────────┐ ┌────────┐
//!  │ Kinect │ │ Replay │
//!  └────────┘ └────────┘
//! ```
//!
//! Sensors never call back into the application: the event loop polls them
//! for the next frame, so all frame handling stays on the loop thread.

#[cfg(all(target_arch = "x86_64", feature = "freedepth"))]
pub mod kinect;
pub mod motor;
pub mod replay;

#[cfg(all(target_arch = "x86_64", feature = "freedepth"))]
pub use kinect::KinectSensor;
pub use motor::{SimulatedMotor, clamp_tilt};
pub use replay::ReplaySensor;

use crate::config::Config;
use crate::depth::DepthBuffer;
use crate::errors::AppResult;
use std::path::Path;

/// RGB frame from the sensor's color camera, displayed as-is
pub type VideoFrame = image::RgbImage;

/// A connected depth sensor
pub trait DepthSensor {
    /// Human readable device name
    fn name(&self) -> &str;

    /// Start depth and video streaming
    fn start(&mut self) -> AppResult<()>;

    /// Stop streaming; a no-op when not running
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Next depth frame in millimeters, if one arrived since the last call
    fn poll_depth_frame(&mut self) -> Option<DepthBuffer>;

    /// Next video frame, if one arrived since the last call
    fn poll_video_frame(&mut self) -> Option<VideoFrame>;

    /// Current tilt angle in degrees
    fn tilt(&self) -> AppResult<i8>;

    /// Move the motor to an absolute tilt angle in degrees
    fn set_tilt(&mut self, degrees: i8) -> AppResult<()>;
}

/// Open the sensor selected by the configuration
///
/// A replay file takes precedence over hardware.
pub fn open_sensor(config: &Config, replay: Option<&Path>) -> AppResult<Box<dyn DepthSensor>> {
    match replay {
        Some(path) => Ok(Box::new(ReplaySensor::open(
            path,
            config.frame_width,
            config.frame_height,
            config.replay_fps,
        )?)),
        None => open_hardware(config.device_index),
    }
}

#[cfg(all(target_arch = "x86_64", feature = "freedepth"))]
fn open_hardware(device_index: usize) -> AppResult<Box<dyn DepthSensor>> {
    Ok(Box::new(KinectSensor::new(device_index)))
}

#[cfg(not(all(target_arch = "x86_64", feature = "freedepth")))]
fn open_hardware(_device_index: usize) -> AppResult<Box<dyn DepthSensor>> {
    Err(crate::errors::AppError::device(
        "built without depth camera support (freedepth feature); use --replay FILE",
    ))
}
