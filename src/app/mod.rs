// SPDX-License-Identifier: GPL-3.0-only

//! Live capture session
//!
//! # Architecture
//!
//! - `state`: `Session`, `Message` and `Task`
//! - `update`: message dispatcher
//! - `handlers`: frame processing, controls and snapshots
//! - `countdown`: snapshot countdown state machine
//! - `scheduler`: single-slot timer for delayed messages
//!
//! The session never blocks and never touches the terminal. A driver feeds it
//! messages one at a time and carries out the returned [`Task`]; [`dispatch`]
//! and [`pump`] do that part so every driver behaves the same.

pub mod countdown;
pub mod handlers;
pub mod scheduler;
pub mod state;
mod update;

pub use countdown::{Countdown, CountdownState, Tick};
pub use scheduler::Scheduler;
pub use state::{Message, Notice, Session, Task};

use crate::backends::sensor::DepthSensor;
use std::time::Instant;

/// Whether the event loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Hand one message to the session and carry out the resulting task
pub fn dispatch(
    session: &mut Session,
    scheduler: &mut Scheduler<Message>,
    sensor: &mut dyn DepthSensor,
    message: Message,
) -> Flow {
    match session.update(message, sensor) {
        Task::None => Flow::Continue,
        Task::Delay { after, message } => {
            scheduler.schedule_after(after, message);
            Flow::Continue
        }
        Task::Quit => {
            scheduler.cancel();
            Flow::Quit
        }
    }
}

/// Deliver whatever the sensor and the timer have ready
///
/// Depth frames go first so a capture armed by the previous tick saves the
/// frame that arrived while it was armed.
pub fn pump(
    session: &mut Session,
    scheduler: &mut Scheduler<Message>,
    sensor: &mut dyn DepthSensor,
    now: Instant,
) -> Flow {
    if let Some(buffer) = sensor.poll_depth_frame()
        && dispatch(session, scheduler, sensor, Message::DepthFrame(buffer)) == Flow::Quit
    {
        return Flow::Quit;
    }

    if let Some(frame) = sensor.poll_video_frame()
        && dispatch(session, scheduler, sensor, Message::VideoFrame(frame)) == Flow::Quit
    {
        return Flow::Quit;
    }

    match scheduler.take_due(now) {
        Some(message) => dispatch(session, scheduler, sensor, message),
        None => Flow::Continue,
    }
}
