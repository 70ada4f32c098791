use super::window::{Extent, SampleWindow};
use super::SignalDetector;
use crate::sample::Timestamp;

/// Rolling spike counter for short taps/kicks on a single axis.
///
/// Counts rising edges: the newest value must clear `threshold` and rise
/// `min_rise` above the rest of the window. After counting, the detector
/// stays disarmed until the signal drops below `threshold * rearm_fraction`.
#[derive(Debug, Clone)]
pub struct TapDetector {
    window: SampleWindow,
    threshold: f64,
    min_rise: f64,
    rearm_level: f64,
    armed: bool,
    count: u32,
}

impl TapDetector {
    /// Create a tap detector
    ///
    /// # Panics
    ///
    /// Panics if the window has fewer than two slots or `rearm_fraction` is not in (0, 1)
    #[must_use]
    pub fn new(slots: usize, step: i64, threshold: f64, min_rise: f64, rearm_fraction: f64) -> Self {
        assert!(slots >= 2, "Tap window needs at least 2 slots, got {}", slots);
        assert!(
            rearm_fraction > 0.0 && rearm_fraction < 1.0,
            "Rearm fraction must be in (0, 1), got {}",
            rearm_fraction
        );
        Self {
            window: SampleWindow::new(slots, step),
            threshold,
            min_rise,
            rearm_level: threshold * rearm_fraction,
            armed: true,
            count: 0,
        }
    }

    /// Spikes counted since the last reset
    #[must_use]
    pub fn num_peaks(&self) -> u32 {
        self.count
    }

    fn check_spike(&mut self) {
        let Some(current) = self.window.latest() else {
            return;
        };
        if !self.armed {
            if current < self.rearm_level {
                self.armed = true;
            }
            return;
        }
        if !self.window.is_full() || current < self.threshold {
            return;
        }
        let older = self.window.iter().take(self.window.len() - 1);
        if let Some(baseline) = Extent::of(older) {
            if current - baseline.min >= self.min_rise {
                self.count += 1;
                self.armed = false;
            }
        }
    }
}

impl SignalDetector for TapDetector {
    fn add_value(&mut self, timestamp: Timestamp, value: f64) {
        if self.window.push(timestamp, value) > 0 {
            self.check_spike();
        }
    }

    fn reset(&mut self) {
        self.window.clear();
        self.armed = true;
        self.count = 0;
    }

    fn name(&self) -> &str {
        "TapDetector"
    }
}
