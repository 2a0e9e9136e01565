// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules, grouped by what they control

pub mod capture;
pub mod depth_camera;
