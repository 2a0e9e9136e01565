// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `update()` only routes; the work happens in the `handlers` submodules:
//!
//! - `handlers::capture`: snapshot countdown and depth file writing
//! - `handlers::depth_camera`: frames, threshold window, tilt motor

use crate::app::state::{Message, Session, Task};
use crate::backends::sensor::DepthSensor;
use tracing::info;

impl Session {
    /// Handle one message from the event loop
    pub fn update(&mut self, message: Message, sensor: &mut dyn DepthSensor) -> Task {
        if message.is_user_input() {
            self.notice = None;
        }

        match message {
            // ===== Sensor =====
            Message::DepthFrame(buffer) => self.handle_depth_frame(buffer),
            Message::VideoFrame(frame) => self.handle_video_frame(frame),

            // ===== Snapshot =====
            Message::TakeShot => self.handle_take_shot(),
            Message::CountdownTick => self.handle_countdown_tick(),

            // ===== Controls =====
            Message::AdjustThreshold(delta) => self.handle_adjust_threshold(delta),
            Message::AdjustTilt(delta) => self.handle_adjust_tilt(delta, sensor),

            Message::Quit => {
                info!("Quit requested");
                self.shutdown();
                Task::Quit
            }
        }
    }
}
