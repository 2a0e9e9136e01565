// SPDX-License-Identifier: GPL-3.0-only

//! Live session state

use crate::app::countdown::Countdown;
use crate::backends::sensor::VideoFrame;
use crate::config::Config;
use crate::depth::{DepthBuffer, GrayscaleImage, GrayscaleMapping, Shading, ThresholdWindow};
use crate::errors::AppResult;
use std::path::PathBuf;
use std::time::Duration;

/// Everything the live session reacts to
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Sensor =====
    /// New depth frame in millimeters
    DepthFrame(DepthBuffer),
    /// New color frame
    VideoFrame(VideoFrame),

    // ===== Snapshot =====
    /// Arm (or re-arm) the snapshot countdown
    TakeShot,
    /// One second of countdown elapsed
    CountdownTick,

    // ===== Controls =====
    /// Move the far edge of the threshold window by this many millimeters
    AdjustThreshold(i32),
    /// Move the tilt motor by this many degrees
    AdjustTilt(i8),

    Quit,
}

impl Message {
    /// Whether the message comes from a key press
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Message::TakeShot | Message::AdjustThreshold(_) | Message::AdjustTilt(_) | Message::Quit
        )
    }
}

/// What the event loop should do after a message was handled
#[derive(Debug)]
pub enum Task {
    None,
    /// Deliver `message` after `after`, replacing any pending delayed message
    Delay { after: Duration, message: Message },
    Quit,
}

impl Task {
    pub fn none() -> Self {
        Task::None
    }

    pub fn delay(after: Duration, message: Message) -> Self {
        Task::Delay { after, message }
    }
}

/// Transient line shown after the threshold/countdown text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved(PathBuf),
    SaveFailed(String),
}

/// Single-owner state of the live capture tool
pub struct Session {
    pub(crate) window: ThresholdWindow,
    pub(crate) mapping: GrayscaleMapping,
    pub(crate) shading: Shading,
    pub(crate) reduction_factor: u32,
    pub(crate) snapshot_dir: PathBuf,
    pub(crate) countdown: Countdown,
    pub(crate) tilt: i8,
    pub(crate) depth_image: Option<GrayscaleImage>,
    pub(crate) video_image: Option<VideoFrame>,
    pub(crate) notice: Option<Notice>,
    pub(crate) depth_frames: u64,
    pub(crate) snapshots_written: u32,
}

impl Session {
    pub fn new(config: &Config) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            window: config.threshold_window()?,
            mapping: config.mapping()?,
            shading: config.shading,
            reduction_factor: config.reduction_factor,
            snapshot_dir: config.snapshot_dir.clone(),
            countdown: Countdown::new(config.countdown_seconds),
            tilt: 0,
            depth_image: None,
            video_image: None,
            notice: None,
            depth_frames: 0,
            snapshots_written: 0,
        })
    }

    pub fn window(&self) -> ThresholdWindow {
        self.window
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Last requested tilt angle
    pub fn tilt(&self) -> i8 {
        self.tilt
    }

    /// Latest rendered depth view
    pub fn depth_image(&self) -> Option<&GrayscaleImage> {
        self.depth_image.as_ref()
    }

    /// Latest color frame
    pub fn video_image(&self) -> Option<&VideoFrame> {
        self.video_image.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn snapshots_written(&self) -> u32 {
        self.snapshots_written
    }

    /// Status line: threshold, then countdown or save progress
    pub fn status_text(&self) -> String {
        let mut text = format!("Threshold: {}", self.window.end());

        if self.countdown.is_capturing() {
            text.push_str(" SAVING DEPTH FILE!");
        } else if let Some(n) = self.countdown.shown() {
            text.push_str(&format!(" Taking shot in: {} seconds", n));
        }

        match &self.notice {
            Some(Notice::Saved(path)) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                text.push_str(&format!(" Saved {}", name));
            }
            Some(Notice::SaveFailed(reason)) => {
                text.push_str(&format!(" Save failed: {}", reason));
            }
            None => {}
        }

        text
    }

    /// Drop any armed countdown; nothing is written afterwards
    pub fn shutdown(&mut self) {
        if self.countdown.is_armed() {
            tracing::info!("Discarding pending snapshot");
        }
        self.countdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status() {
        let session = Session::new(&Config::default()).unwrap();
        assert_eq!(session.status_text(), "Threshold: 1500");
        assert!(session.depth_image().is_none());
    }

    #[test]
    fn test_user_input_messages() {
        assert!(Message::TakeShot.is_user_input());
        assert!(Message::AdjustTilt(5).is_user_input());
        assert!(!Message::CountdownTick.is_user_input());
    }

    #[test]
    fn test_saved_notice_shows_file_name() {
        let mut session = Session::new(&Config::default()).unwrap();
        session.notice = Some(Notice::Saved(PathBuf::from("/tmp/depth-data-42")));
        assert_eq!(session.status_text(), "Threshold: 1500 Saved depth-data-42");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            countdown_seconds: 0,
            ..Config::default()
        };
        assert!(Session::new(&config).is_err());
    }
}
