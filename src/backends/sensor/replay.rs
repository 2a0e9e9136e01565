// SPDX-License-Identifier: GPL-3.0-only

//! Raw depth file replayed as a live sensor
//!
//! Emits the same frame at a fixed rate, has no color camera, and tilts a
//! simulated motor. Lets the live tool run without hardware.

use super::{DepthSensor, SimulatedMotor, VideoFrame};
use crate::depth::{DepthBuffer, read_raw_depth};
use crate::errors::AppResult;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

pub struct ReplaySensor {
    name: String,
    frame: DepthBuffer,
    interval: Duration,
    next_frame_at: Option<Instant>,
    motor: SimulatedMotor,
    running: bool,
}

impl ReplaySensor {
    /// Load a `width × height` raw depth file to replay at `fps`
    pub fn open(path: &Path, width: u32, height: u32, fps: u32) -> AppResult<Self> {
        let frame = read_raw_depth(path, width, height)?;
        info!(path = %path.display(), width, height, fps, "Loaded replay frame");

        let name = format!("Replay of {}", path.display());
        Ok(Self::from_buffer(name, frame, fps))
    }

    pub fn from_buffer(name: impl Into<String>, frame: DepthBuffer, fps: u32) -> Self {
        Self {
            name: name.into(),
            frame,
            interval: Duration::from_secs(1) / fps.max(1),
            next_frame_at: None,
            motor: SimulatedMotor::new(),
            running: false,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.interval
    }
}

impl DepthSensor for ReplaySensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> AppResult<()> {
        info!(name = %self.name, "Starting replay");
        self.running = true;
        self.next_frame_at = Some(Instant::now());
        self.motor.set_tilt(0);
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            info!(name = %self.name, "Stopping replay");
        }
        self.running = false;
        self.next_frame_at = None;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll_depth_frame(&mut self) -> Option<DepthBuffer> {
        let due = self.next_frame_at?;
        let now = Instant::now();
        if now < due {
            return None;
        }

        self.next_frame_at = Some(now + self.interval);
        Some(self.frame.clone())
    }

    fn poll_video_frame(&mut self) -> Option<VideoFrame> {
        None
    }

    fn tilt(&self) -> AppResult<i8> {
        Ok(self.motor.tilt())
    }

    fn set_tilt(&mut self, degrees: i8) -> AppResult<()> {
        self.motor.set_tilt(degrees);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(fps: u32) -> ReplaySensor {
        let frame = DepthBuffer::new(2, 2, vec![600, 700, 800, 900]).unwrap();
        ReplaySensor::from_buffer("test", frame, fps)
    }

    #[test]
    fn test_no_frames_before_start() {
        let mut replay = sensor(30);
        assert!(replay.poll_depth_frame().is_none());
        assert!(replay.poll_video_frame().is_none());
    }

    #[test]
    fn test_one_frame_per_interval() {
        let mut replay = sensor(1);
        replay.start().unwrap();

        let frame = replay.poll_depth_frame().unwrap();
        assert_eq!(frame.samples(), &[600, 700, 800, 900]);
        // The next one is a full second away
        assert!(replay.poll_depth_frame().is_none());
    }

    #[test]
    fn test_stop_ends_stream() {
        let mut replay = sensor(30);
        replay.start().unwrap();
        replay.stop();
        assert!(!replay.is_running());
        assert!(replay.poll_depth_frame().is_none());
    }

    #[test]
    fn test_interval_from_fps() {
        assert_eq!(sensor(10).frame_interval(), Duration::from_millis(100));
        assert_eq!(sensor(0).frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_simulated_tilt() {
        let mut replay = sensor(30);
        replay.set_tilt(10).unwrap();
        assert_eq!(replay.tilt().unwrap(), 10);
    }
}
