// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot countdown
//!
//! ```text
//!            trigger                 tick (shows 0)
//!   Idle ───────────▶ Counting(n) ───────────────▶ Capturing
//!    ▲                  │    ▲                          │
//!    │                  └────┘ tick: show n, n -= 1     │
//!    └──────────────────────────────────────────────────┘
//!                       depth frame written
//! ```
//!
//! Triggering from any state restarts at `Counting(start)`.

use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Counting(u32),
    /// Waiting for the next depth frame to save
    Capturing,
}

/// Result of a countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting, another tick is needed
    Continue,
    /// Reached zero; the next depth frame gets saved
    Armed,
    /// Not counting, nothing happened
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    start: u32,
    state: CountdownState,
    shown: Option<u32>,
}

impl Countdown {
    pub fn new(start: u32) -> Self {
        Self {
            start,
            state: CountdownState::Idle,
            shown: None,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Number currently displayed to the user
    pub fn shown(&self) -> Option<u32> {
        self.shown
    }

    /// Counting or capturing
    pub fn is_armed(&self) -> bool {
        self.state != CountdownState::Idle
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CountdownState::Capturing
    }

    /// Restart the countdown from the beginning
    ///
    /// Returns true when a countdown or capture was already pending.
    pub fn trigger(&mut self) -> bool {
        let restarted = self.is_armed();
        self.state = CountdownState::Counting(self.start);
        self.shown = Some(self.start);
        if restarted {
            info!(seconds = self.start, "Snapshot countdown restarted");
        } else {
            info!(seconds = self.start, "Snapshot countdown started");
        }
        restarted
    }

    pub fn tick(&mut self) -> Tick {
        let CountdownState::Counting(n) = self.state else {
            return Tick::Ignored;
        };

        self.shown = Some(n);
        if n == 0 {
            debug!("Countdown finished, waiting for depth frame");
            self.state = CountdownState::Capturing;
            Tick::Armed
        } else {
            debug!(remaining = n, "Countdown tick");
            self.state = CountdownState::Counting(n - 1);
            Tick::Continue
        }
    }

    /// Consume the capture request, if one is armed
    pub fn take_capture(&mut self) -> bool {
        if self.state != CountdownState::Capturing {
            return false;
        }
        self.state = CountdownState::Idle;
        self.shown = None;
        true
    }

    pub fn cancel(&mut self) {
        self.state = CountdownState::Idle;
        self.shown = None;
    }
}
