//! Working state for the length currently being swum.

use crate::config::Config;
use crate::detectors::{PeakDetector, TapDetector};
use crate::events::{Event, EventLog, RollState};
use crate::length::{LengthStatistics, TurnKind};
use crate::sample::{Sample, Timestamp};
use crate::utils::CircularMean;
use serde::Serialize;

/// Swim classification (two effective states)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SwimState {
    NotSwimming,
    Swimming,
}

impl SwimState {
    #[must_use]
    pub fn is_swimming(self) -> bool {
        self == SwimState::Swimming
    }

    /// Event value code
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            SwimState::NotSwimming => 0,
            SwimState::Swimming => 1,
        }
    }
}

/// Stroke classification.
///
/// Breaststroke and butterfly are not told apart; `Butterfly` is never
/// produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StrokeKind {
    Unknown,
    Breast,
    Crawl,
    Back,
    Butterfly,
}

/// Which way the body tipped when it left the horizontal posture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchExit {
    /// Head went down (tumble)
    Down,
    /// Head came up
    Up,
}

impl PitchExit {
    #[must_use]
    pub fn from_pitch(pitch: f64) -> Self {
        if pitch < 0.0 {
            PitchExit::Down
        } else {
            PitchExit::Up
        }
    }
}

/// Mutable state of the current length.
///
/// Replaced wholesale at every length boundary.
#[derive(Debug)]
pub struct LengthSession {
    pub swimming: SwimState,
    /// Best stroke guess so far
    pub stroke: StrokeKind,
    /// Events since the length started
    pub events: EventLog,
    /// Sample being processed; cleared when the session is replaced mid-sample
    pub latest: Option<Sample>,
    /// Nanoseconds from length start to the latest swimming sample
    pub time_in_length: i64,
    /// Counted rolls to the left
    pub left_count: u32,
    /// Counted rolls to the right
    pub right_count: u32,
    /// Breaststroke kicks
    pub thrust_count: u32,
    /// Most recent `RollChange`
    pub last_roll: Option<Event>,
    /// Most recent `Thrust`, for the refractory period
    pub last_thrust: Option<Event>,
    /// Which way pitch left horizontal
    pub pitch_exit: Option<PitchExit>,
    /// Running mean of yaw while swimming
    pub heading: CircularMean,
    /// Kick detector on forward acceleration
    pub peaks: PeakDetector,
    /// Spike counter on forward acceleration
    pub taps: TapDetector,
    last_side: Option<RollState>,
}

impl LengthSession {
    /// Fresh session with detectors built from `config`
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            swimming: SwimState::NotSwimming,
            stroke: StrokeKind::Unknown,
            events: EventLog::new(),
            latest: None,
            time_in_length: 0,
            left_count: 0,
            right_count: 0,
            thrust_count: 0,
            last_roll: None,
            last_thrust: None,
            pitch_exit: None,
            heading: CircularMean::new(),
            peaks: PeakDetector::from_config(&config.thrust),
            taps: TapDetector::from_config(&config.tap),
            last_side: None,
        }
    }

    /// Last logged roll bucket
    #[must_use]
    pub fn last_roll_state(&self) -> Option<RollState> {
        self.last_roll.and_then(|e| RollState::from_code(e.value))
    }

    /// Count a change into `next` from roll bucket `previous`.
    ///
    /// A side counts when the last side seen was the opposite side, or when
    /// arriving from a neutral bucket (or the first roll of the length).
    /// Neutral buckets never update the side memory.
    pub fn count_roll(&mut self, previous: Option<RollState>, next: RollState) {
        let (counter, opposite) = match next {
            RollState::Left => (&mut self.left_count, RollState::Right),
            RollState::UpsideDownRight => (&mut self.left_count, RollState::UpsideDownLeft),
            RollState::Right => (&mut self.right_count, RollState::Left),
            RollState::UpsideDownLeft => (&mut self.right_count, RollState::UpsideDownRight),
            RollState::Flat | RollState::UpsideDownFlat => return,
        };
        let from_rest = previous.map_or(true, RollState::is_neutral);
        if from_rest || self.last_side == Some(opposite) {
            *counter += 1;
        }
        self.last_side = Some(next);
    }

    /// Update the stroke classification from the counters so far
    pub fn classify_stroke(&mut self, min_roll_strokes: u32, min_thrusts: u32) {
        let on_back = self.last_roll_state().map(RollState::is_upside_down);
        match self.stroke {
            StrokeKind::Crawl | StrokeKind::Back => {
                if let Some(on_back) = on_back {
                    self.stroke = if on_back { StrokeKind::Back } else { StrokeKind::Crawl };
                }
            }
            _ => {
                if self.left_count + self.right_count >= min_roll_strokes {
                    self.stroke = if on_back == Some(true) {
                        StrokeKind::Back
                    } else {
                        StrokeKind::Crawl
                    };
                } else if self.thrust_count >= min_thrusts {
                    self.stroke = StrokeKind::Breast;
                }
            }
        }
    }

    /// Strokes so far, derived from the classification
    #[must_use]
    pub fn stroke_count(&self) -> u32 {
        match self.stroke {
            StrokeKind::Crawl | StrokeKind::Back => self.left_count + self.right_count,
            StrokeKind::Breast | StrokeKind::Butterfly => self.thrust_count,
            StrokeKind::Unknown => 0,
        }
    }

    /// Turn kind implied by the last pitch exit
    #[must_use]
    pub fn turn_kind(&self) -> TurnKind {
        match self.pitch_exit {
            Some(PitchExit::Down) => TurnKind::Flip,
            _ => TurnKind::Open,
        }
    }

    /// Snapshot this length for reporting
    #[must_use]
    pub fn capture(&self, length_start: Timestamp, direction: Option<f64>, turn: TurnKind) -> LengthStatistics {
        LengthStatistics {
            length_start,
            length_time: self.time_in_length,
            stroke_count: self.stroke_count(),
            stroke: self.stroke,
            turn,
            direction,
        }
    }
}

/// Read-only view of the in-progress length for live display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwimSnapshot {
    /// Timestamp of the latest sample
    pub timestamp: Timestamp,
    pub swimming: SwimState,
    pub stroke: StrokeKind,
    pub stroke_count: u32,
    pub left_count: u32,
    pub right_count: u32,
    pub thrust_count: u32,
    pub tap_count: u32,
    pub time_in_length: i64,
    pub length_start: Timestamp,
    /// Estimated pool direction in radians
    pub direction: Option<f64>,
    pub event_count: usize,
    /// A finished length is waiting on turn confirmation
    pub turn_pending: bool,
}
