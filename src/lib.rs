// SPDX-License-Identifier: GPL-3.0-only

//! depthcam - depth file viewer and live snapshot tool for Kinect depth cameras
//!
//! # Architecture
//!
//! - [`depth`]: depth buffers, grayscale mapping, downsampling, markers, raw files
//! - [`app`]: live capture session (countdown, threshold, tilt)
//! - [`backends`]: depth sensor abstraction with Kinect and replay backends
//! - [`terminal`]: half-block terminal renderer and event loops
//! - [`viewer`]: raw depth file rendered with point markers
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```no_run
//! use depthcam::depth::{GrayscaleMapping, read_raw_depth, render};
//!
//! let buffer = read_raw_depth("depth-data-1700000000000000", 640, 480)?;
//! let image = render(&buffer, &GrayscaleMapping::default());
//! image.save("depth.png")?;
//! # Ok::<(), depthcam::errors::AppError>(())
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod depth;
pub mod errors;
pub mod terminal;
pub mod viewer;

// Re-export commonly used types
pub use app::{Message, Session};
pub use config::Config;
pub use errors::{AppError, AppResult};
