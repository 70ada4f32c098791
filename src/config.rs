//! Configuration management for the swim metrics engine

use crate::constants::{
    DEFAULT_DIRECTION_MIN_SAMPLES, DEFAULT_LENGTH_DEBOUNCE_SECS, DEFAULT_MAX_LENGTH_SECS,
    DEFAULT_MAX_PITCH_FROM_HORIZONTAL, DEFAULT_MIN_LENGTH_SECS, DEFAULT_MIN_ROLL_STROKES,
    DEFAULT_MIN_THRUSTS, DEFAULT_PEAK_FLAT_FRACTION, DEFAULT_PEAK_MIN_VALUE,
    DEFAULT_PEAK_WINDOW_SECS, DEFAULT_RESTART_DEBOUNCE_SECS, DEFAULT_ROLL_STROKE_THRESHOLD,
    DEFAULT_STOP_TIMEOUT_SECS, DEFAULT_TAP_MIN_RISE, DEFAULT_TAP_REARM_FRACTION,
    DEFAULT_TAP_THRESHOLD, DEFAULT_TAP_WINDOW_SECS, DEFAULT_THRUST_REFRACTORY_SECS,
    DEFAULT_TURN_ANGLE, DEFAULT_TURN_CONFIRM_SECS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

/// Engine and replay configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Swim/stop classification
    pub swim: SwimConfig,

    /// Roll-based stroke counting
    pub roll: RollConfig,

    /// Pool direction estimation and turn detection
    pub direction: DirectionConfig,

    /// Kick (thrust) detection
    pub thrust: ThrustConfig,

    /// Auxiliary tap/spike counter
    pub tap: TapConfig,

    /// Stroke type classification
    pub stroke: StrokeConfig,

    /// Length reporting bounds
    pub length: LengthConfig,

    /// Sensor log replay
    pub replay: ReplayConfig,
}

/// Swim/stop classification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimConfig {
    /// Largest |pitch| (radians) still counted as a horizontal swimming posture
    pub max_pitch_from_horizontal: f64,

    /// A return to horizontal this soon after a pitch change is treated as a glitch
    pub restart_debounce_secs: f64,

    /// A restart this soon after a turn confirms the turn
    pub turn_confirm_secs: f64,

    /// Standing upright this long ends the length
    pub stop_timeout_secs: f64,

    /// Time into a length before roll, direction and kicks are tracked
    pub length_debounce_secs: f64,
}

/// Roll bucketing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    /// Roll (radians) away from flat that counts as leaning to one side
    pub stroke_threshold: f64,
}

/// Direction estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionConfig {
    /// Headings accumulated before the direction estimate is trusted
    pub min_samples: u32,

    /// Heading change (radians) from the estimate that counts as a turn
    pub turn_angle: f64,
}

/// Kick peak detector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustConfig {
    /// Length of the resampled window
    pub window_secs: f64,

    /// Share of the window treated as the flat baseline
    pub flat_fraction: f64,

    /// Minimum peak value in m/s²
    pub min_peak: f64,

    /// Minimum spacing between kicks
    pub refractory_secs: f64,
}

/// Tap/spike counter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapConfig {
    /// Length of the resampled window
    pub window_secs: f64,

    /// Minimum spike value in m/s²
    pub threshold: f64,

    /// Minimum rise above the window minimum
    pub min_rise: f64,

    /// Signal must fall below `threshold * rearm_fraction` before the next spike
    pub rearm_fraction: f64,
}

/// Stroke classification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Left+right rolls needed to call the stroke crawl or backstroke
    pub min_roll_strokes: u32,

    /// Kicks needed to call the stroke breaststroke
    pub min_thrusts: u32,
}

/// Plausible length durations (exclusive bounds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

/// Sensor log replay options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// First log line is a header row
    pub has_headers: bool,

    /// Interval between progress log lines, in sensor seconds
    pub progress_interval_secs: f64,
}

impl Default for SwimConfig {
    fn default() -> Self {
        Self {
            max_pitch_from_horizontal: DEFAULT_MAX_PITCH_FROM_HORIZONTAL,
            restart_debounce_secs: DEFAULT_RESTART_DEBOUNCE_SECS,
            turn_confirm_secs: DEFAULT_TURN_CONFIRM_SECS,
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
            length_debounce_secs: DEFAULT_LENGTH_DEBOUNCE_SECS,
        }
    }
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            stroke_threshold: DEFAULT_ROLL_STROKE_THRESHOLD,
        }
    }
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            min_samples: DEFAULT_DIRECTION_MIN_SAMPLES,
            turn_angle: DEFAULT_TURN_ANGLE,
        }
    }
}

impl Default for ThrustConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_PEAK_WINDOW_SECS,
            flat_fraction: DEFAULT_PEAK_FLAT_FRACTION,
            min_peak: DEFAULT_PEAK_MIN_VALUE,
            refractory_secs: DEFAULT_THRUST_REFRACTORY_SECS,
        }
    }
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_TAP_WINDOW_SECS,
            threshold: DEFAULT_TAP_THRESHOLD,
            min_rise: DEFAULT_TAP_MIN_RISE,
            rearm_fraction: DEFAULT_TAP_REARM_FRACTION,
        }
    }
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            min_roll_strokes: DEFAULT_MIN_ROLL_STROKES,
            min_thrusts: DEFAULT_MIN_THRUSTS,
        }
    }
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_MIN_LENGTH_SECS,
            max_secs: DEFAULT_MAX_LENGTH_SECS,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            has_headers: false,
            progress_interval_secs: 60.0,
        }
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be positive, got {value}")))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must not be negative, got {value}")))
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be between 0.0 and 1.0, got {value}")))
    }
}

fn check_angle(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= PI {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be in (0, π] radians, got {value}")))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        check_angle("swim.max_pitch_from_horizontal", self.swim.max_pitch_from_horizontal)?;
        check_non_negative("swim.restart_debounce_secs", self.swim.restart_debounce_secs)?;
        check_positive("swim.turn_confirm_secs", self.swim.turn_confirm_secs)?;
        check_positive("swim.stop_timeout_secs", self.swim.stop_timeout_secs)?;
        check_non_negative("swim.length_debounce_secs", self.swim.length_debounce_secs)?;

        check_angle("roll.stroke_threshold", self.roll.stroke_threshold)?;
        if self.roll.stroke_threshold >= PI / 2.0 {
            return Err(Error::ConfigError(
                "roll.stroke_threshold must be below π/2 radians".to_string(),
            ));
        }

        if self.direction.min_samples == 0 {
            return Err(Error::ConfigError(
                "direction.min_samples must be greater than 0".to_string(),
            ));
        }
        check_angle("direction.turn_angle", self.direction.turn_angle)?;

        check_positive("thrust.window_secs", self.thrust.window_secs)?;
        if self.thrust.window_secs < 0.02 {
            return Err(Error::ConfigError(
                "thrust.window_secs must cover at least two 10 ms slots".to_string(),
            ));
        }
        check_fraction("thrust.flat_fraction", self.thrust.flat_fraction)?;
        check_non_negative("thrust.refractory_secs", self.thrust.refractory_secs)?;

        check_positive("tap.window_secs", self.tap.window_secs)?;
        if self.tap.window_secs < 0.02 {
            return Err(Error::ConfigError(
                "tap.window_secs must cover at least two 10 ms slots".to_string(),
            ));
        }
        check_fraction("tap.rearm_fraction", self.tap.rearm_fraction)?;
        check_non_negative("tap.min_rise", self.tap.min_rise)?;

        if self.stroke.min_roll_strokes == 0 {
            return Err(Error::ConfigError(
                "stroke.min_roll_strokes must be greater than 0".to_string(),
            ));
        }

        check_non_negative("length.min_secs", self.length.min_secs)?;
        check_positive("length.max_secs", self.length.max_secs)?;
        if self.length.min_secs >= self.length.max_secs {
            return Err(Error::ConfigError(format!(
                "length.min_secs ({}) must be below length.max_secs ({})",
                self.length.min_secs, self.length.max_secs
            )));
        }

        check_positive("replay.progress_interval_secs", self.replay.progress_interval_secs)?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Swim Metrics Configuration

# Swim/stop classification (angles in radians, times in seconds)
swim:
  max_pitch_from_horizontal: 0.698131701
  restart_debounce_secs: 1.0
  turn_confirm_secs: 2.0
  stop_timeout_secs: 5.0
  length_debounce_secs: 1.0

# Roll-based stroke counting
roll:
  stroke_threshold: 0.349066

# Pool direction and turns
direction:
  min_samples: 100
  turn_angle: 1.5707963267948966

# Kick detection
thrust:
  window_secs: 1.0
  flat_fraction: 0.8
  min_peak: 2.0
  refractory_secs: 0.5

# Tap/spike counter
tap:
  window_secs: 0.5
  threshold: 1.5
  min_rise: 1.0
  rearm_fraction: 0.5

# Stroke classification
stroke:
  min_roll_strokes: 3
  min_thrusts: 2

# Reported length bounds
length:
  min_secs: 4.0
  max_secs: 300.0

# Log replay
replay:
  has_headers: false
  progress_interval_secs: 60.0
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_example_matches_default() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed = Config::from_yaml("length:\n  min_secs: 8.0\n").unwrap();
        assert_eq!(parsed.length.min_secs, 8.0);
        assert_eq!(parsed.length.max_secs, DEFAULT_MAX_LENGTH_SECS);
        assert_eq!(parsed.swim, SwimConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("swim: [1, 2").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_validate_rejects_inverted_length_bounds() {
        let mut config = Config::default();
        config.length.min_secs = 400.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let mut config = Config::default();
        config.thrust.flat_fraction = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tap.rearm_fraction = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_angles() {
        let mut config = Config::default();
        config.direction.turn_angle = 4.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.roll.stroke_threshold = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_direction_samples() {
        let mut config = Config::default();
        config.direction.min_samples = 0;
        assert!(config.validate().is_err());
    }
}
