//! Streaming swim classifier.
//!
//! [`SwimMetricExtractor`] consumes orientation and acceleration samples one
//! at a time and runs, per sample and in order:
//!
//! 1. turn detection from heading drift against the pool direction estimate
//! 2. swim/stop classification from pitch
//! 3. roll bucketing and left/right stroke counting
//! 4. pool direction estimation (circular mean of heading)
//! 5. kick detection from acceleration peaks
//! 6. stroke classification
//!
//! Lengths ending in a suspected turn are held as a [`PendingLength`] until
//! the next restart shows whether the swimmer turned or stopped.
//! All callbacks run inline on the caller's thread.

use crate::config::Config;
use crate::detectors::SignalDetector;
use crate::events::{Event, EventKind, RollState};
use crate::length::{LengthLimits, LengthStatistics, PendingLength, TurnKind};
use crate::sample::{Acceleration, Orientation, Sample, Timestamp};
use crate::state::{LengthSession, PitchExit, SwimSnapshot, SwimState};
use crate::utils::angle_difference;
use crate::utils::safe_cast::{nanos_to_secs, secs_to_nanos_clamp};
use crate::Result;
use log::{error, info};

/// Receiver of engine output
pub trait SwimCallback {
    /// Called for every logged event
    fn on_event(&mut self, event: &Event);

    /// Called when a length is finalized and passes the duration guard
    fn on_length_complete(&mut self, stats: LengthStatistics);

    /// Informational diagnostics
    fn log_info(&mut self, tag: &str, message: &str) {
        info!("[{tag}] {message}");
    }

    /// Error diagnostics
    fn log_error(&mut self, tag: &str, message: &str) {
        error!("[{tag}] {message}");
    }
}

impl<C: SwimCallback + ?Sized> SwimCallback for &mut C {
    fn on_event(&mut self, event: &Event) {
        (**self).on_event(event);
    }

    fn on_length_complete(&mut self, stats: LengthStatistics) {
        (**self).on_length_complete(stats);
    }

    fn log_info(&mut self, tag: &str, message: &str) {
        (**self).log_info(tag, message);
    }

    fn log_error(&mut self, tag: &str, message: &str) {
        (**self).log_error(tag, message);
    }
}

/// Callback that keeps everything it receives
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    /// Every event in arrival order
    pub events: Vec<Event>,
    /// Reported lengths
    pub lengths: Vec<LengthStatistics>,
    /// Error diagnostics as `tag: message`
    pub errors: Vec<String>,
}

impl Recorder {
    /// Empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events of one kind
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}

impl SwimCallback for Recorder {
    fn on_event(&mut self, event: &Event) {
        self.events.push(*event);
    }

    fn on_length_complete(&mut self, stats: LengthStatistics) {
        self.lengths.push(stats);
    }

    fn log_error(&mut self, tag: &str, message: &str) {
        error!("[{tag}] {message}");
        self.errors.push(format!("{tag}: {message}"));
    }
}

/// How the current length is ending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EndType {
    /// A turn was just detected; hold the length until the restart
    Turning,
    /// Swimming restarted promptly after a turn
    Turned,
    /// Swimming restarted (or stopped for good) without a prompt turn
    NotTurned,
}

/// Config values resolved to the units the engine works in
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    max_pitch: f64,
    restart_debounce: i64,
    turn_confirm: i64,
    stop_timeout: i64,
    length_debounce: i64,
    roll_threshold: f64,
    turn_angle: f64,
    min_direction_samples: u32,
    thrust_refractory: i64,
    min_roll_strokes: u32,
    min_thrusts: u32,
}

impl Thresholds {
    fn from_config(config: &Config) -> Self {
        Self {
            max_pitch: config.swim.max_pitch_from_horizontal,
            restart_debounce: secs_to_nanos_clamp(config.swim.restart_debounce_secs),
            turn_confirm: secs_to_nanos_clamp(config.swim.turn_confirm_secs),
            stop_timeout: secs_to_nanos_clamp(config.swim.stop_timeout_secs),
            length_debounce: secs_to_nanos_clamp(config.swim.length_debounce_secs),
            roll_threshold: config.roll.stroke_threshold,
            turn_angle: config.direction.turn_angle,
            min_direction_samples: config.direction.min_samples,
            thrust_refractory: secs_to_nanos_clamp(config.thrust.refractory_secs),
            min_roll_strokes: config.stroke.min_roll_strokes,
            min_thrusts: config.stroke.min_thrusts,
        }
    }
}

/// Online swim metrics engine
pub struct SwimMetricExtractor<C: SwimCallback> {
    callback: C,
    config: Config,
    thresholds: Thresholds,
    limits: LengthLimits,
    session: LengthSession,
    pending: Option<PendingLength>,
    last_orientation: Option<Orientation>,
    last_timestamp: Timestamp,
    length_start: Timestamp,
    last_pitch_change: Option<Event>,
    direction: Option<f64>,
}

impl<C: SwimCallback> SwimMetricExtractor<C> {
    /// Create an engine with the default configuration
    pub fn new(callback: C) -> Self {
        Self::build(Config::default(), callback)
    }

    /// Create an engine from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn with_config(config: Config, callback: C) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, callback))
    }

    fn build(config: Config, callback: C) -> Self {
        Self {
            callback,
            thresholds: Thresholds::from_config(&config),
            limits: LengthLimits::from_config(&config.length),
            session: LengthSession::new(&config),
            config,
            pending: None,
            last_orientation: None,
            last_timestamp: 0,
            length_start: 0,
            last_pitch_change: None,
            direction: None,
        }
    }

    /// Orientation sample, angles in radians
    pub fn on_orientation_change(&mut self, timestamp: Timestamp, yaw: f64, pitch: f64, roll: f64) {
        self.push(Sample::Orientation(Orientation::new(timestamp, yaw, pitch, roll)));
    }

    /// Acceleration sample with gravity already removed
    pub fn on_linear_acceleration(&mut self, timestamp: Timestamp, x: f64, y: f64, z: f64) {
        self.push(Sample::Acceleration(Acceleration::linear(timestamp, x, y, z)));
    }

    /// Raw acceleration sample including gravity
    pub fn on_global_acceleration(&mut self, timestamp: Timestamp, x: f64, y: f64, z: f64) {
        self.push(Sample::Acceleration(Acceleration::global(timestamp, x, y, z)));
    }

    /// Feed one sample. Timestamps must not decrease.
    pub fn push(&mut self, sample: Sample) {
        if let Sample::Orientation(orientation) = sample {
            self.last_orientation = Some(orientation);
        }
        self.last_timestamp = sample.timestamp();
        self.session.latest = Some(sample);
        self.update_state();
    }

    /// End of input: finalize whatever length is in progress.
    ///
    /// A pending turn is reported as a stop. Calling this again without new
    /// events does nothing.
    pub fn finish(&mut self) {
        self.end_of_length(EndType::NotTurned);
    }

    /// Snapshot of the in-progress length
    #[must_use]
    pub fn state(&self) -> SwimSnapshot {
        SwimSnapshot {
            timestamp: self.last_timestamp,
            swimming: self.session.swimming,
            stroke: self.session.stroke,
            stroke_count: self.session.stroke_count(),
            left_count: self.session.left_count,
            right_count: self.session.right_count,
            thrust_count: self.session.thrust_count,
            tap_count: self.session.taps.num_peaks(),
            time_in_length: self.session.time_in_length,
            length_start: self.length_start,
            direction: self.direction,
            event_count: self.session.events.len(),
            turn_pending: self.pending.is_some(),
        }
    }

    /// Length held while a turn awaits confirmation
    #[must_use]
    pub fn pending_length(&self) -> Option<&LengthStatistics> {
        self.pending.as_ref().map(PendingLength::stats)
    }

    /// Events logged so far in the current length
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.session.events.iter()
    }

    /// Configuration the engine was built with
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Receiver of events and lengths
    #[must_use]
    pub fn callback(&self) -> &C {
        &self.callback
    }

    /// Mutable access to the callback between samples
    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    /// Consume the engine, returning the callback
    pub fn into_callback(self) -> C {
        self.callback
    }

    fn update_state(&mut self) {
        let Some(orientation) = self.last_orientation else {
            return;
        };
        let now = self.last_timestamp;

        if self.session.swimming.is_swimming() {
            self.session.time_in_length = now - self.length_start;
        }

        if self.detect_turn(now, orientation.yaw) {
            return;
        }

        if !self.classify_swimming(now, &orientation) {
            return;
        }

        if !self.session.swimming.is_swimming() {
            return;
        }

        if self.session.time_in_length > self.thresholds.length_debounce {
            self.track_roll(now, orientation.roll);
            self.track_direction(orientation.yaw);
            self.track_thrust(now);
        }

        self.session
            .classify_stroke(self.thresholds.min_roll_strokes, self.thresholds.min_thrusts);
    }

    /// Returns true when a turn consumed this sample
    fn detect_turn(&mut self, now: Timestamp, yaw: f64) -> bool {
        let Some(direction) = self.direction else {
            return false;
        };
        if !yaw.is_finite() || angle_difference(yaw, direction) <= self.thresholds.turn_angle {
            return false;
        }

        if !self.session.events.is_empty() {
            let was_swimming = self.session.swimming;
            self.end_of_length(EndType::Turning);
            self.length_start = now;
            self.log_event(Event::new(now, EventKind::LengthStart, 1));
            if was_swimming.is_swimming() {
                self.log_event(Event::new(now, EventKind::SwimStateChange, SwimState::NotSwimming.code()));
            }
            self.callback
                .log_info("turn", &format!("heading left pool direction at {:.3}s", nanos_to_secs(now)));
        }
        self.direction = None;
        self.session.swimming = SwimState::NotSwimming;
        true
    }

    /// Returns false when the sample ends here (swimmer just left the horizontal)
    fn classify_swimming(&mut self, now: Timestamp, orientation: &Orientation) -> bool {
        let pitch = orientation.pitch.abs();

        if !self.session.swimming.is_swimming() {
            if pitch < self.thresholds.max_pitch {
                let glitch = self.last_pitch_change.is_some_and(|change| {
                    now - change.timestamp <= self.thresholds.restart_debounce
                        && change.timestamp > self.length_start
                });
                if glitch {
                    // Brief upright blip mid-length, keep the length going
                } else if orientation.timestamp - self.length_start < self.thresholds.turn_confirm {
                    self.end_of_length(EndType::Turned);
                } else {
                    self.end_of_length(EndType::NotTurned);
                    self.length_start = orientation.timestamp;
                    self.log_event(Event::new(now, EventKind::LengthStart, 0));
                }
                let change = Event::new(now, EventKind::PitchChange, 0);
                self.last_pitch_change = Some(change);
                self.log_event(change);
                self.session.swimming = SwimState::Swimming;
                self.log_event(Event::new(now, EventKind::SwimStateChange, SwimState::Swimming.code()));
            } else if let Some(change) = self.last_pitch_change {
                if !self.session.events.is_empty() && now - change.timestamp > self.thresholds.stop_timeout {
                    self.end_of_length(EndType::NotTurned);
                }
            }
            return true;
        }

        if pitch > self.thresholds.max_pitch {
            self.session.swimming = SwimState::NotSwimming;
            self.session.pitch_exit = Some(PitchExit::from_pitch(orientation.pitch));
            let change = Event::new(now, EventKind::PitchChange, 1);
            self.last_pitch_change = Some(change);
            self.log_event(change);
            self.log_event(Event::new(now, EventKind::SwimStateChange, SwimState::NotSwimming.code()));
            return false;
        }
        true
    }

    fn track_roll(&mut self, now: Timestamp, roll: f64) {
        let next = RollState::classify(roll, self.thresholds.roll_threshold);
        let previous = self.session.last_roll_state();
        if previous == Some(next) {
            return;
        }
        let event = Event::new(now, EventKind::RollChange, next.code());
        self.session.last_roll = Some(event);
        self.log_event(event);
        self.session.count_roll(previous, next);
    }

    fn track_direction(&mut self, yaw: f64) {
        if !matches!(self.session.latest, Some(Sample::Orientation(_))) || !yaw.is_finite() {
            return;
        }
        self.session.heading.add(yaw);
        if self.session.heading.count() > self.thresholds.min_direction_samples {
            self.direction = self.session.heading.mean();
        }
    }

    fn track_thrust(&mut self, now: Timestamp) {
        let Some(Sample::Acceleration(accel)) = self.session.latest else {
            return;
        };

        let refractory = self
            .session
            .last_thrust
            .is_some_and(|thrust| now - thrust.timestamp <= self.thresholds.thrust_refractory);

        self.session.peaks.add_value(accel.timestamp, accel.thrust_signal());
        if accel.gravity_removed {
            self.session.taps.add_value(accel.timestamp, accel.vector.z);
        }

        if !refractory && self.session.peaks.is_peak() {
            self.session.thrust_count += 1;
            let event = Event::new(now, EventKind::Thrust, 0);
            self.session.last_thrust = Some(event);
            self.log_event(event);
        }
    }

    pub(crate) fn end_of_length(&mut self, end: EndType) {
        // Nothing happened since the last boundary
        if self.session.events.is_empty() {
            return;
        }

        match end {
            EndType::NotTurned => match self.pending.take() {
                Some(pending) => self.report(pending.downgrade()),
                None => {
                    let stats = self.session.capture(self.length_start, self.direction, TurnKind::Stopped);
                    self.report(stats);
                }
            },
            EndType::Turned => match self.pending.take() {
                Some(pending) => {
                    let end = self
                        .session
                        .events
                        .first()
                        .map_or(self.last_timestamp, |event| event.timestamp);
                    self.report(pending.confirm(end));
                }
                None => self
                    .callback
                    .log_info("length", "restart straight after a length start, nothing to confirm"),
            },
            EndType::Turning => {
                let stats = self
                    .session
                    .capture(self.length_start, self.direction, self.session.turn_kind());
                if let Some(previous) = self.pending.replace(PendingLength::new(stats)) {
                    self.callback
                        .log_error("length", "turn detected while another turn was unresolved");
                    self.report(previous.downgrade());
                }
            }
        }

        self.session = LengthSession::new(&self.config);
    }

    fn report(&mut self, stats: LengthStatistics) {
        if self.limits.admits(&stats) {
            self.callback.on_length_complete(stats);
        } else {
            self.callback.log_info(
                "length",
                &format!("discarding implausible {:.1}s length", stats.length_secs()),
            );
        }
    }

    fn log_event(&mut self, event: Event) {
        self.session.events.push(event);
        self.callback.on_event(&event);
    }
}
