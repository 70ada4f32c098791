//! Constants used throughout the library

/// Standard gravity in m/s²
pub const GRAVITY_EARTH: f64 = 9.806_65;

/// Nanoseconds in one second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Grid spacing of the resampling window used by the acceleration detectors
pub const RESAMPLE_STEP_NANOS: i64 = 10_000_000;

/// Default pitch limit for "horizontal" swimming posture (40°)
pub const DEFAULT_MAX_PITCH_FROM_HORIZONTAL: f64 = 0.698_131_701;

/// Default roll needed before a lean counts as a stroke side (20°)
pub const DEFAULT_ROLL_STROKE_THRESHOLD: f64 = 0.349_066;

/// Default swim timing windows, in seconds
pub const DEFAULT_RESTART_DEBOUNCE_SECS: f64 = 1.0;
pub const DEFAULT_TURN_CONFIRM_SECS: f64 = 2.0;
pub const DEFAULT_STOP_TIMEOUT_SECS: f64 = 5.0;
pub const DEFAULT_LENGTH_DEBOUNCE_SECS: f64 = 1.0;

/// Default direction estimation parameters
pub const DEFAULT_DIRECTION_MIN_SAMPLES: u32 = 100;
pub const DEFAULT_TURN_ANGLE: f64 = std::f64::consts::FRAC_PI_2;

/// Default thrust (kick) peak detector parameters
pub const DEFAULT_PEAK_WINDOW_SECS: f64 = 1.0;
pub const DEFAULT_PEAK_FLAT_FRACTION: f64 = 0.8;
pub const DEFAULT_PEAK_MIN_VALUE: f64 = 2.0;
pub const DEFAULT_THRUST_REFRACTORY_SECS: f64 = 0.5;

/// Default tap/spike detector parameters
pub const DEFAULT_TAP_WINDOW_SECS: f64 = 0.5;
pub const DEFAULT_TAP_THRESHOLD: f64 = 1.5;
pub const DEFAULT_TAP_MIN_RISE: f64 = 1.0;
pub const DEFAULT_TAP_REARM_FRACTION: f64 = 0.5;

/// Default stroke classification thresholds
pub const DEFAULT_MIN_ROLL_STROKES: u32 = 3;
pub const DEFAULT_MIN_THRUSTS: u32 = 2;

/// Default plausible length duration bounds, in seconds (exclusive)
pub const DEFAULT_MIN_LENGTH_SECS: f64 = 4.0;
pub const DEFAULT_MAX_LENGTH_SECS: f64 = 300.0;
