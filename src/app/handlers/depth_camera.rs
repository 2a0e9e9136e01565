// SPDX-License-Identifier: GPL-3.0-only

//! Depth camera handlers
//!
//! Turns incoming frames into display images and applies threshold and tilt
//! adjustments.

use crate::app::state::{Session, Task};
use crate::backends::sensor::{DepthSensor, VideoFrame, clamp_tilt};
use crate::constants::timing::FRAME_LOG_INTERVAL;
use crate::depth::{DepthBuffer, downsample, synthesize};
use tracing::{debug, info, warn};

impl Session {
    pub(crate) fn handle_depth_frame(&mut self, buffer: DepthBuffer) -> Task {
        self.depth_frames += 1;
        if self.depth_frames % FRAME_LOG_INTERVAL == 1 {
            debug!(
                frames = self.depth_frames,
                width = buffer.width(),
                height = buffer.height(),
                range = ?buffer.valid_range(),
                "Depth frames received"
            );
        }

        // The snapshot is the frame as delivered, before any gating
        self.capture_if_armed(&buffer);

        match downsample(&buffer, self.reduction_factor, self.window) {
            Ok(reduced) => {
                self.depth_image = Some(synthesize(&reduced, &self.mapping, self.shading));
            }
            Err(e) => warn!(error = %e, "Skipping depth frame"),
        }

        Task::none()
    }

    pub(crate) fn handle_video_frame(&mut self, frame: VideoFrame) -> Task {
        self.video_image = Some(frame);
        Task::none()
    }

    pub(crate) fn handle_adjust_threshold(&mut self, delta: i32) -> Task {
        if self.window.adjust_end(delta) {
            info!(
                begin = self.window.begin(),
                end = self.window.end(),
                "Threshold changed"
            );
        } else {
            debug!(end = self.window.end(), "Threshold already at its limit");
        }
        Task::none()
    }

    pub(crate) fn handle_adjust_tilt(&mut self, delta: i8, sensor: &mut dyn DepthSensor) -> Task {
        // Step from where the motor actually is; hardware may clamp tighter
        let current = match sensor.tilt() {
            Ok(angle) => angle,
            Err(e) => {
                debug!(error = %e, cached = self.tilt, "Tilt unavailable, using last request");
                self.tilt
            }
        };
        self.tilt = current;

        let degrees = clamp_tilt(current as i32 + delta as i32);
        if degrees == current {
            return Task::none();
        }

        match sensor.set_tilt(degrees) {
            Ok(()) => {
                info!(degrees, "Tilt changed");
                self.tilt = degrees;
            }
            Err(e) => warn!(error = %e, "Failed to set tilt"),
        }
        Task::none()
    }
}
