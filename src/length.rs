//! Finished-length reports and the reporting guard.

use crate::config::LengthConfig;
use crate::sample::Timestamp;
use crate::state::StrokeKind;
use crate::utils::safe_cast::{nanos_to_secs, secs_to_nanos_clamp};
use serde::Serialize;

/// How a length ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TurnKind {
    /// Tumble turn (head went down on the way out)
    Flip,
    /// Open turn (head stayed up)
    Open,
    /// The swimmer stopped rather than turned
    Stopped,
}

/// Immutable report of one completed length
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthStatistics {
    /// Timestamp the length started at
    pub length_start: Timestamp,
    /// Duration in nanoseconds
    pub length_time: i64,
    pub stroke_count: u32,
    pub stroke: StrokeKind,
    pub turn: TurnKind,
    /// Pool direction estimate in radians, if one had formed
    pub direction: Option<f64>,
}

impl LengthStatistics {
    /// Duration in seconds
    #[must_use]
    pub fn length_secs(&self) -> f64 {
        nanos_to_secs(self.length_time)
    }
}

/// Exclusive duration bounds for reporting a length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthLimits {
    pub min: i64,
    pub max: i64,
}

impl LengthLimits {
    #[must_use]
    pub fn from_config(config: &LengthConfig) -> Self {
        Self {
            min: secs_to_nanos_clamp(config.min_secs),
            max: secs_to_nanos_clamp(config.max_secs),
        }
    }

    /// Whether a length is plausible enough to report
    #[must_use]
    pub fn admits(&self, stats: &LengthStatistics) -> bool {
        stats.length_time > self.min && stats.length_time < self.max
    }
}

impl Default for LengthLimits {
    fn default() -> Self {
        Self::from_config(&LengthConfig::default())
    }
}

/// A length ended by a suspected turn, held until the next length
/// either starts promptly (turn confirmed) or does not (swimmer stopped).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingLength(LengthStatistics);

impl PendingLength {
    #[must_use]
    pub fn new(stats: LengthStatistics) -> Self {
        Self(stats)
    }

    #[must_use]
    pub fn stats(&self) -> &LengthStatistics {
        &self.0
    }

    /// Turn confirmed: the length runs until `end`, the first event of the next length
    #[must_use]
    pub fn confirm(self, end: Timestamp) -> LengthStatistics {
        LengthStatistics {
            length_time: end - self.0.length_start,
            ..self.0
        }
    }

    /// Not a turn after all: keep the captured counters, mark as stopped
    #[must_use]
    pub fn downgrade(self) -> LengthStatistics {
        LengthStatistics {
            turn: TurnKind::Stopped,
            ..self.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(length_time: i64) -> LengthStatistics {
        LengthStatistics {
            length_start: 1_000,
            length_time,
            stroke_count: 12,
            stroke: StrokeKind::Crawl,
            turn: TurnKind::Flip,
            direction: Some(0.25),
        }
    }

    #[test]
    fn test_duration_guard() {
        let limits = LengthLimits::default();
        assert!(!limits.admits(&stats(3_900_000_000)));
        assert!(!limits.admits(&stats(4_000_000_000)));
        assert!(limits.admits(&stats(4_100_000_000)));
        assert!(limits.admits(&stats(299_900_000_000)));
        assert!(!limits.admits(&stats(300_000_000_000)));
        assert!(!limits.admits(&stats(300_100_000_000)));
    }

    #[test]
    fn test_confirm_extends_to_next_length() {
        let pending = PendingLength::new(stats(20_000_000_000));
        let confirmed = pending.confirm(21_500_001_000);
        assert_eq!(confirmed.length_time, 21_500_000_000);
        assert_eq!(confirmed.turn, TurnKind::Flip);
        assert_eq!(confirmed.stroke_count, 12);
    }

    #[test]
    fn test_downgrade_keeps_counters() {
        let original = stats(20_000_000_000);
        let stopped = PendingLength::new(original).downgrade();
        assert_eq!(stopped.turn, TurnKind::Stopped);
        assert_eq!(stopped.length_time, original.length_time);
        assert_eq!(stopped.stroke_count, original.stroke_count);
        assert_eq!(stopped.stroke, original.stroke);
        assert_eq!(stopped.direction, original.direction);
    }

    #[test]
    fn test_length_secs() {
        assert!((stats(4_100_000_000).length_secs() - 4.1).abs() < 1e-12);
    }
}
