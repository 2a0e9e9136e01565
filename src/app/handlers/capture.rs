// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot handlers
//!
//! Handles the countdown timer and writing the captured depth frame.

use crate::app::countdown::Tick;
use crate::app::state::{Message, Notice, Session, Task};
use crate::constants::snapshot::TICK_INTERVAL;
use crate::depth::{DepthBuffer, snapshot_path, write_raw_depth};
use crate::errors::AppResult;
use std::path::PathBuf;
use tracing::{error, info};

impl Session {
    pub(crate) fn handle_take_shot(&mut self) -> Task {
        self.countdown.trigger();
        Task::delay(TICK_INTERVAL, Message::CountdownTick)
    }

    pub(crate) fn handle_countdown_tick(&mut self) -> Task {
        match self.countdown.tick() {
            Tick::Continue => Task::delay(TICK_INTERVAL, Message::CountdownTick),
            Tick::Armed | Tick::Ignored => Task::none(),
        }
    }

    /// Save `buffer` if a capture is armed
    ///
    /// The countdown goes back to idle whether or not the write succeeds.
    pub(crate) fn capture_if_armed(&mut self, buffer: &DepthBuffer) {
        if !self.countdown.take_capture() {
            return;
        }

        match self.write_snapshot(buffer) {
            Ok(path) => {
                self.snapshots_written += 1;
                self.notice = Some(Notice::Saved(path));
            }
            Err(e) => {
                error!(error = %e, "Failed to save depth snapshot");
                self.notice = Some(Notice::SaveFailed(e.to_string()));
            }
        }
    }

    /// Write the raw, unthresholded frame to a timestamped file
    fn write_snapshot(&self, buffer: &DepthBuffer) -> AppResult<PathBuf> {
        let timestamp = chrono::Utc::now().timestamp_micros();
        let path = snapshot_path(&self.snapshot_dir, timestamp);
        write_raw_depth(&path, buffer)?;
        info!(path = %path.display(), "Depth snapshot saved");
        Ok(path)
    }
}
