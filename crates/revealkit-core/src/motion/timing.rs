//! L4 Atomic Layer: Time calculation utilities
//!
//! Pure functions for animation progress and interpolation. All times are
//! seconds as `f64`, taken from the host's frame clock rather than the wall
//! clock so a page can be replayed deterministically.

/// Calculate progress (0.0 to 1.0) of an animation that started at `start`
///
/// # Arguments
/// * `now` - Current time on the frame clock
/// * `start` - Animation start time
/// * `duration` - Total animation duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]; a zero duration completes at `start`
#[inline]
pub fn progress(now: f64, start: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return if now >= start { 1.0 } else { 0.0 };
    }
    ((now - start) / duration).clamp(0.0, 1.0)
}

/// Check if an animation is complete
#[inline]
pub fn is_complete(now: f64, start: f64, duration: f64) -> bool {
    now >= start + duration.max(0.0)
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
///
/// # Returns
/// Interpolated value; exact at both ends
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    if t >= 1.0 {
        return to;
    }
    from + (to - from) * t
}

/// Where `value` sits between `start` and `end`, clamped to [0.0, 1.0]
///
/// A degenerate range acts as a step at `start`.
#[inline]
pub fn inverse_lerp(start: f64, end: f64, value: f64) -> f64 {
    let span = end - start;
    if span.abs() < f64::EPSILON {
        return if value >= start { 1.0 } else { 0.0 };
    }
    ((value - start) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert_eq!(lerp(0.3, -280.0, 1.0), -280.0);
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(0.0, 1.0, 2.0), 0.0);
        assert!((progress(2.0, 1.0, 2.0) - 0.5).abs() < 0.001);
        assert_eq!(progress(9.0, 1.0, 2.0), 1.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert_eq!(progress(0.5, 1.0, 0.0), 0.0);
        assert_eq!(progress(1.0, 1.0, 0.0), 1.0);
        assert!(is_complete(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_inverse_lerp_clamps() {
        assert_eq!(inverse_lerp(100.0, 200.0, 50.0), 0.0);
        assert!((inverse_lerp(100.0, 200.0, 125.0) - 0.25).abs() < 0.001);
        assert_eq!(inverse_lerp(100.0, 200.0, 500.0), 1.0);
        assert_eq!(inverse_lerp(100.0, 100.0, 99.0), 0.0);
        assert_eq!(inverse_lerp(100.0, 100.0, 100.0), 1.0);
    }
}
