//! Whole-session totals built from the engine's outputs.

use crate::events::{Event, EventKind};
use crate::length::LengthStatistics;
use crate::sample::Timestamp;
use crate::state::SwimSnapshot;

/// Session timing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingState {
    /// Waiting for the first length to start
    AutoStart,
    /// Timing and counting lengths
    Started,
    /// Frozen; nothing is counted
    Stopped,
}

/// Running session times, in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntermediateTimes {
    /// Wall time since the first length started
    pub total_time: i64,
    /// Time spent in lengths, never decreasing
    pub swim_time: i64,
    pub lengths: u32,
    pub current_length_time: i64,
}

/// Session timer: starts on the first length, sums reported lengths
#[derive(Debug, Clone)]
pub struct SessionTimer {
    state: TimingState,
    started_at: Timestamp,
    completed_swim_time: i64,
    last_swim_time: i64,
    lengths: u32,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TimingState::AutoStart,
            started_at: 0,
            completed_swim_time: 0,
            last_swim_time: 0,
            lengths: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> TimingState {
        self.state
    }

    #[must_use]
    pub fn lengths(&self) -> u32 {
        self.lengths
    }

    /// Swim time of all reported lengths
    #[must_use]
    pub fn completed_swim_time(&self) -> i64 {
        self.completed_swim_time
    }

    pub fn on_event(&mut self, event: &Event) {
        if self.state == TimingState::AutoStart && event.kind == EventKind::LengthStart {
            self.state = TimingState::Started;
            self.started_at = event.timestamp;
        }
    }

    pub fn on_length_complete(&mut self, stats: &LengthStatistics) {
        if self.state == TimingState::Stopped {
            return;
        }
        self.lengths += 1;
        self.completed_swim_time += stats.length_time;
    }

    /// Live totals for display, `None` until the session has started
    pub fn intermediate(&mut self, snapshot: &SwimSnapshot) -> Option<IntermediateTimes> {
        if self.state != TimingState::Started {
            return None;
        }
        // The in-progress length can shrink when a turn is confirmed
        let swim_time = (self.completed_swim_time + snapshot.time_in_length).max(self.last_swim_time);
        self.last_swim_time = swim_time;
        Some(IntermediateTimes {
            total_time: snapshot.timestamp - self.started_at,
            swim_time,
            lengths: self.lengths,
            current_length_time: snapshot.time_in_length,
        })
    }

    pub fn stop(&mut self) {
        self.state = TimingState::Stopped;
    }

    /// Back to waiting for a first length, totals cleared
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}
