use super::window::{Extent, SampleWindow};
use super::SignalDetector;
use crate::sample::Timestamp;

/// Kick detector over a one-second resampled window.
///
/// The window is split into an older "flat" part and a newer "peak" part.
/// A peak is reported when the newest part rises above an absolute floor and
/// above the flat part's maximum by at least the flat part's own range.
#[derive(Debug, Clone)]
pub struct PeakDetector {
    window: SampleWindow,
    flat_len: usize,
    min_peak: f64,
    flat: Option<Extent>,
    peak: Option<Extent>,
}

impl PeakDetector {
    /// Create a peak detector
    ///
    /// # Panics
    ///
    /// Panics if the window has fewer than two slots or `flat_fraction` is not in (0, 1)
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn new(slots: usize, step: i64, flat_fraction: f64, min_peak: f64) -> Self {
        assert!(slots >= 2, "Peak window needs at least 2 slots, got {}", slots);
        assert!(
            flat_fraction > 0.0 && flat_fraction < 1.0,
            "Flat fraction must be in (0, 1), got {}",
            flat_fraction
        );
        let flat_len = ((slots as f64 * flat_fraction).round() as usize).clamp(1, slots - 1);
        Self {
            window: SampleWindow::new(slots, step),
            flat_len,
            min_peak,
            flat: None,
            peak: None,
        }
    }

    /// Whether the current window ends in a peak
    #[must_use]
    pub fn is_peak(&self) -> bool {
        let (Some(flat), Some(peak)) = (self.flat, self.peak) else {
            return false;
        };
        if peak.max < self.min_peak {
            return false;
        }
        peak.max >= flat.max + flat.range()
    }

    fn update_extents(&mut self) {
        if !self.window.is_full() {
            return;
        }
        self.flat = Extent::of(self.window.iter().take(self.flat_len));
        self.peak = Extent::of(self.window.iter().skip(self.flat_len));
    }
}

impl SignalDetector for PeakDetector {
    fn add_value(&mut self, timestamp: Timestamp, value: f64) {
        self.window.push(timestamp, value);
        self.update_extents();
    }

    fn reset(&mut self) {
        self.window.clear();
        self.flat = None;
        self.peak = None;
    }

    fn name(&self) -> &str {
        "PeakDetector"
    }
}
