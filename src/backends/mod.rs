// SPDX-License-Identifier: GPL-3.0-only

//! Hardware access
//!
//! - [`sensor`]: depth sensor abstraction with the Kinect (freedepth) and
//!   raw-file replay implementations

pub mod sensor;
