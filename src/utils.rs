//! Utility functions for angles and time conversion.

pub mod safe_cast;

use std::f64::consts::PI;

/// Shortest-arc difference between two angles in radians, in `[0, π]`.
///
/// Inputs are expected in `[-π, π]` (as delivered by orientation sensors),
/// so a single wrap is enough: `angle_difference(π - 0.01, -π + 0.01)` is
/// `0.02`, not `2π - 0.02`.
#[must_use]
pub fn angle_difference(angle1: f64, angle2: f64) -> f64 {
    let diff = (angle1 - angle2).abs();
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}

/// Running circular mean of headings (vector sum of unit directions).
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularMean {
    sum_cos: f64,
    sum_sin: f64,
    count: u32,
}

impl CircularMean {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a heading in radians
    pub fn add(&mut self, angle: f64) {
        self.sum_cos += angle.cos();
        self.sum_sin += angle.sin();
        self.count += 1;
    }

    /// Number of headings accumulated
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Mean heading in `[-π, π]`, or `None` before any sample
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum_sin.atan2(self.sum_cos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_difference_simple() {
        assert!((angle_difference(0.5, 0.2) - 0.3).abs() < 1e-12);
        assert!((angle_difference(-0.5, 0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_difference_wraparound() {
        let diff = angle_difference(PI - 0.01, -PI + 0.01);
        assert!((diff - 0.02).abs() < 1e-9, "got {diff}");
    }

    #[test]
    fn test_angle_difference_opposite() {
        assert!((angle_difference(0.0, PI) - PI).abs() < 1e-12);
        assert!((angle_difference(PI / 2.0, -PI / 2.0) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_circular_mean_across_wrap() {
        let mut mean = CircularMean::new();
        assert!(mean.mean().is_none());

        // Headings straddling ±π average to π, not 0
        mean.add(PI - 0.1);
        mean.add(-PI + 0.1);
        let m = mean.mean().unwrap();
        assert_eq!(mean.count(), 2);
        assert!(angle_difference(m, PI) < 1e-9, "got {m}");
    }
}
