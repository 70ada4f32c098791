//! Sensor sample value types pushed into the engine.
//!
//! Samples are plain `Copy` values: the engine keeps at most the latest one
//! of each kind and never hands out references to them.

use crate::constants::GRAVITY_EARTH;
use nalgebra::Vector3;

/// Monotonic sensor timestamp in nanoseconds
pub type Timestamp = i64;

/// Resolved device orientation, angles in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub timestamp: Timestamp,
    /// Compass heading
    pub yaw: f64,
    /// Forward/backward tilt, 0 when lying flat
    pub pitch: f64,
    /// Side-to-side rotation, ±π when upside down
    pub roll: f64,
}

impl Orientation {
    #[must_use]
    pub fn new(timestamp: Timestamp, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            timestamp,
            yaw,
            pitch,
            roll,
        }
    }
}

/// Acceleration in m/s², with or without gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceleration {
    pub timestamp: Timestamp,
    pub vector: Vector3<f64>,
    /// True when the caller already removed gravity (linear acceleration)
    pub gravity_removed: bool,
}

impl Acceleration {
    /// Linear acceleration (gravity already removed)
    #[must_use]
    pub fn linear(timestamp: Timestamp, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp,
            vector: Vector3::new(x, y, z),
            gravity_removed: true,
        }
    }

    /// Raw acceleration including gravity
    #[must_use]
    pub fn global(timestamp: Timestamp, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp,
            vector: Vector3::new(x, y, z),
            gravity_removed: false,
        }
    }

    /// Signal fed to the kick detector.
    ///
    /// Linear samples use the forward (y) axis; raw samples use the
    /// magnitude with standard gravity subtracted.
    #[must_use]
    pub fn thrust_signal(&self) -> f64 {
        if self.gravity_removed {
            self.vector.y
        } else {
            self.vector.norm() - GRAVITY_EARTH
        }
    }
}

/// One input sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Orientation(Orientation),
    Acceleration(Acceleration),
}

impl Sample {
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Sample::Orientation(o) => o.timestamp,
            Sample::Acceleration(a) => a.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrust_signal_linear_uses_y() {
        let accel = Acceleration::linear(0, 5.0, 2.5, -1.0);
        assert_eq!(accel.thrust_signal(), 2.5);
    }

    #[test]
    fn test_thrust_signal_global_removes_gravity() {
        let at_rest = Acceleration::global(0, 0.0, 0.0, GRAVITY_EARTH);
        assert!(at_rest.thrust_signal().abs() < 1e-12);

        let pushed = Acceleration::global(0, 3.0, 0.0, 4.0);
        assert!((pushed.thrust_signal() - (5.0 - GRAVITY_EARTH)).abs() < 1e-12);
    }

    #[test]
    fn test_sample_timestamp() {
        let s = Sample::Orientation(Orientation::new(42, 0.0, 0.0, 0.0));
        assert_eq!(s.timestamp(), 42);
        let s = Sample::Acceleration(Acceleration::linear(7, 0.0, 0.0, 0.0));
        assert_eq!(s.timestamp(), 7);
    }
}
