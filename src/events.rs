//! Typed, timestamped events logged during the current length.

use crate::sample::Timestamp;
use serde::Serialize;

/// Event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    /// Start of a length: value 0 from standing, 1 after a turn
    LengthStart,
    /// Roll bucket changed: value is a [`RollState`] code
    RollChange,
    /// Pitch changed: 0 horizontal, 1 upright
    PitchChange,
    /// Breaststroke/butterfly kick
    Thrust,
    /// Swim classification changed: 0 not swimming, 1 swimming
    SwimStateChange,
}

/// An immutable logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Event {
    pub timestamp: Timestamp,
    pub kind: EventKind,
    pub value: i32,
}

impl Event {
    #[must_use]
    pub fn new(timestamp: Timestamp, kind: EventKind, value: i32) -> Self {
        Self { timestamp, kind, value }
    }
}

/// Bucketed roll posture.
///
/// Codes above 1 are upside-down (on the back) variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollState {
    Flat,
    Right,
    Left,
    UpsideDownFlat,
    UpsideDownRight,
    UpsideDownLeft,
}

impl RollState {
    /// Bucket a roll angle (radians) using the given side threshold
    #[must_use]
    pub fn classify(roll: f64, threshold: f64) -> Self {
        use std::f64::consts::{FRAC_PI_2, PI};

        if roll.abs() > FRAC_PI_2 {
            if roll.abs() > PI - threshold {
                RollState::UpsideDownFlat
            } else if roll < 0.0 {
                RollState::UpsideDownLeft
            } else {
                RollState::UpsideDownRight
            }
        } else if roll > threshold {
            RollState::Right
        } else if roll < -threshold {
            RollState::Left
        } else {
            RollState::Flat
        }
    }

    /// Event value code
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            RollState::Flat => 0,
            RollState::Right => 1,
            RollState::Left => -1,
            RollState::UpsideDownFlat => 10,
            RollState::UpsideDownRight => 9,
            RollState::UpsideDownLeft => 11,
        }
    }

    /// Inverse of [`RollState::code`]
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(RollState::Flat),
            1 => Some(RollState::Right),
            -1 => Some(RollState::Left),
            10 => Some(RollState::UpsideDownFlat),
            9 => Some(RollState::UpsideDownRight),
            11 => Some(RollState::UpsideDownLeft),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_upside_down(self) -> bool {
        self.code() > 1
    }

    /// Neutral postures carry no stroke side
    #[must_use]
    pub fn is_neutral(self) -> bool {
        matches!(self, RollState::Flat | RollState::UpsideDownFlat)
    }
}

/// Append-only log of the current length's events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Empty log with room for a typical length
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(1000),
        }
    }

    /// Append an event
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Earliest event, used as the length's start marker
    #[must_use]
    pub fn first(&self) -> Option<&Event> {
        self.events.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
