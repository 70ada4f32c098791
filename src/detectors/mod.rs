//! Windowed acceleration detectors used for kick and tap counting.
//!
//! Both detectors resample their input onto a fixed 10 ms grid so that
//! window lengths are expressed in time, not sample counts.

/// Resampling ring buffer shared by the detectors
pub mod window;

/// Flat-then-rise peak detector for breaststroke/butterfly kicks
pub mod peak;

/// Rising-edge spike counter for auxiliary tap/kick display
pub mod tap;

use crate::config::{TapConfig, ThrustConfig};
use crate::constants::RESAMPLE_STEP_NANOS;
use crate::sample::Timestamp;
use crate::utils::safe_cast::window_slots;

pub use peak::PeakDetector;
pub use tap::TapDetector;

/// Trait for all windowed detectors
pub trait SignalDetector: Send + Sync {
    /// Feed one timestamped value
    fn add_value(&mut self, timestamp: Timestamp, value: f64);

    /// Reset detector state
    fn reset(&mut self);

    /// Get detector name
    fn name(&self) -> &str;
}

impl PeakDetector {
    /// Build from the thrust section of the configuration
    #[must_use]
    pub fn from_config(config: &ThrustConfig) -> Self {
        Self::new(
            window_slots(config.window_secs, RESAMPLE_STEP_NANOS).max(2),
            RESAMPLE_STEP_NANOS,
            config.flat_fraction,
            config.min_peak,
        )
    }
}

impl TapDetector {
    /// Build from the tap section of the configuration
    #[must_use]
    pub fn from_config(config: &TapConfig) -> Self {
        Self::new(
            window_slots(config.window_secs, RESAMPLE_STEP_NANOS).max(2),
            RESAMPLE_STEP_NANOS,
            config.threshold,
            config.min_rise,
            config.rearm_fraction,
        )
    }
}
