//! Safe conversions between configuration seconds and sensor nanoseconds

use crate::constants::NANOS_PER_SECOND;
use crate::{Error, Result};

/// Convert a duration in seconds to nanoseconds with range checking
///
/// # Errors
///
/// Returns an error if the value is not finite, negative, or does not fit in i64
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
#[allow(clippy::cast_precision_loss)] // MIN/MAX bounds checking is approximate
pub fn secs_to_nanos(secs: f64) -> Result<i64> {
    let nanos = secs * NANOS_PER_SECOND as f64;
    if secs.is_finite() && secs >= 0.0 && nanos <= i64::MAX as f64 {
        Ok(nanos.round() as i64)
    } else {
        Err(Error::InvalidInput(format!(
            "Duration {secs}s cannot be represented in nanoseconds"
        )))
    }
}

/// Convert a duration in seconds to nanoseconds, saturating out-of-range values
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
#[allow(clippy::cast_precision_loss)]
pub fn secs_to_nanos_clamp(secs: f64) -> i64 {
    if secs.is_nan() || secs <= 0.0 {
        return 0;
    }
    let nanos = (secs * NANOS_PER_SECOND as f64).round();
    if nanos >= i64::MAX as f64 {
        i64::MAX
    } else {
        nanos as i64
    }
}

/// Convert nanoseconds to seconds for display
#[must_use]
#[allow(clippy::cast_precision_loss)] // Sub-nanosecond precision is irrelevant for display
pub fn nanos_to_secs(nanos: i64) -> f64 {
    nanos as f64 / NANOS_PER_SECOND as f64
}

/// Number of 10 ms grid slots covering `secs`, never zero
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn window_slots(secs: f64, step_nanos: i64) -> usize {
    let slots = (secs_to_nanos_clamp(secs) as f64 / step_nanos.max(1) as f64).round();
    if slots < 1.0 {
        1
    } else {
        slots as usize
    }
}
