// SPDX-License-Identifier: GPL-3.0-only

//! Tilt motor helpers
//!
//! The Kinect motor is driven through freedepth's USB interface; sensors
//! without a motor (replays) use [`SimulatedMotor`] so the tilt keys still
//! behave the same way.

use crate::constants::tilt::{MAX_DEGREES, MIN_DEGREES};
use tracing::debug;

/// Clamp a requested angle to the supported tilt range
pub fn clamp_tilt(degrees: i32) -> i8 {
    degrees.clamp(MIN_DEGREES as i32, MAX_DEGREES as i32) as i8
}

/// Motor that only remembers its angle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedMotor {
    angle: i8,
}

impl SimulatedMotor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tilt(&self) -> i8 {
        self.angle
    }

    pub fn set_tilt(&mut self, degrees: i8) {
        self.angle = clamp_tilt(degrees as i32);
        debug!(degrees = self.angle, "Simulated tilt set");
    }
}
