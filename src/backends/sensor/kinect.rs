// SPDX-License-Identifier: GPL-3.0-only

//! Kinect sensor via freedepth
//!
//! freedepth talks to the device over USB directly, which needs the kernel
//! driver unbound while streaming. `stop()` (and drop) rebinds it.
//!
//! Depth arrives as 11-bit disparity and is converted to millimeters with the
//! device's own calibration before it leaves this module.

use super::{DepthSensor, VideoFrame};
use crate::depth::DepthBuffer;
use crate::errors::{AppError, AppResult};
use freedepth::{
    DepthFormat, DepthFrame, DepthRegistration, DepthToMm, KinectStreamer, Resolution,
    VideoFormat, VideoFrame as KinectVideoFrame,
};
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::{debug, info, warn};

struct Stream {
    streamer: KinectStreamer,
    video_rx: Receiver<KinectVideoFrame>,
    depth_rx: Receiver<DepthFrame>,
    converter: DepthToMm,
}

pub struct KinectSensor {
    device_index: usize,
    name: String,
    stream: Option<Stream>,
}

impl KinectSensor {
    pub fn new(device_index: usize) -> Self {
        Self {
            device_index,
            name: format!("Kinect #{}", device_index),
            stream: None,
        }
    }
}

impl DepthSensor for KinectSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> AppResult<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        info!(device = self.device_index, "Starting depth camera");

        // Unbinds the kernel driver
        let mut streamer = KinectStreamer::new(self.device_index)
            .map_err(|e| AppError::device(format!("failed to open depth camera: {}", e)))?;

        let (video_rx, depth_rx) = streamer
            .start(VideoFormat::Bayer, Resolution::Medium, DepthFormat::Depth11Bit)
            .map_err(|e| AppError::device(format!("failed to start streaming: {}", e)))?;

        let registration = streamer.create_depth_registration();
        let converter = registration.depth_to_mm().clone();
        debug!(
            target_offset = registration.target_offset(),
            "Using device depth calibration"
        );

        if let Err(e) = streamer.set_tilt(0) {
            warn!(error = %e, "Failed to level tilt motor");
        }

        self.stream = Some(Stream {
            streamer,
            video_rx,
            depth_rx,
            converter,
        });
        info!(device = self.device_index, "Depth camera started");
        Ok(())
    }

    fn stop(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };

        info!(device = self.device_index, "Stopping depth camera");
        stream.streamer.stop();
        if let Err(e) = stream.streamer.rebind_driver() {
            warn!("Failed to rebind kernel driver: {}", e);
        }
    }

    fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    fn poll_depth_frame(&mut self) -> Option<DepthBuffer> {
        let stream = self.stream.as_ref()?;
        let frame = latest(&stream.depth_rx, "depth")?;

        let raw = frame.as_u16()?;
        let mut depth_mm = vec![0u16; raw.len()];
        stream.converter.convert_frame(raw, &mut depth_mm);

        match DepthBuffer::new(frame.width, frame.height, depth_mm) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                warn!(error = %e, "Dropping malformed depth frame");
                None
            }
        }
    }

    fn poll_video_frame(&mut self) -> Option<VideoFrame> {
        let stream = self.stream.as_ref()?;
        let frame = latest(&stream.video_rx, "video")?;

        let rgb = match frame.format {
            // The hardware only produces Bayer data, even in "Rgb" mode
            VideoFormat::Rgb | VideoFormat::Bayer => {
                let pixels = (frame.width * frame.height) as usize;
                let mut rgb = vec![0u8; pixels * 3];
                freedepth::convert_bayer_to_rgb(&frame.data, &mut rgb, frame.width, frame.height);
                rgb
            }
            VideoFormat::YuvRgb => frame.data.clone(),
            other => {
                debug!(format = ?other, "Ignoring unsupported video format");
                return None;
            }
        };

        VideoFrame::from_raw(frame.width, frame.height, rgb)
    }

    fn tilt(&self) -> AppResult<i8> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| AppError::device("depth camera not running"))?;
        stream
            .streamer
            .get_tilt()
            .map_err(|e| AppError::device(format!("failed to get tilt: {}", e)))
    }

    fn set_tilt(&mut self, degrees: i8) -> AppResult<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| AppError::device("depth camera not running"))?;
        let degrees = degrees.clamp(freedepth::TILT_MIN_DEGREES, freedepth::TILT_MAX_DEGREES);
        stream
            .streamer
            .set_tilt(degrees)
            .map_err(|e| AppError::device(format!("failed to set tilt: {}", e)))
    }
}

impl Drop for KinectSensor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drain a channel, keeping only the newest frame
fn latest<T>(rx: &Receiver<T>, stream: &str) -> Option<T> {
    let mut newest = None;
    loop {
        match rx.try_recv() {
            Ok(frame) => newest = Some(frame),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                debug!(stream, "Channel disconnected");
                break;
            }
        }
    }
    newest
}
