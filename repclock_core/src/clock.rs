//! Single ticking counter used to time units, rests and exercise changes.
//!
//! The clock has no thread of its own. The host delivers one `tick()` per
//! second; each tick adds exactly one second while the clock is running.
//! Real wall time is never reconciled.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    state: ClockState,
    elapsed_seconds: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// A stopped clock at zero
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            elapsed_seconds: 0,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn start(&mut self) {
        match self.state {
            ClockState::Running => {}
            ClockState::Paused => self.state = ClockState::Running,
            ClockState::Stopped => {
                self.elapsed_seconds = 0;
                self.state = ClockState::Running;
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
        }
    }

    /// Freeze the counter. Ticks are ignored until the next `start()`.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    /// Zero the counter, leaving running/paused state untouched.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
    }

    pub fn tick(&mut self) {
        if self.state == ClockState::Running {
            self.elapsed_seconds += 1;
        }
    }
}
