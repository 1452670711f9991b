//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Lower bound of the jitter multiplier.
pub const JITTER_MIN: f64 = 0.75;

/// Upper bound of the jitter multiplier.
pub const JITTER_MAX: f64 = 1.25;

// 2^32 seconds already exceeds any sensible wait.
const MAX_EXPONENT: u32 = 32;

/// Delay before the retry that follows attempt `attempt` (0-indexed):
/// `base * 2^attempt * jitter`.
///
/// Saturates at [`Duration::MAX`] instead of overflowing.
pub fn backoff_delay(base: Duration, attempt: u32, jitter: f64) -> Duration {
    let factor = 2f64.powi(attempt.min(MAX_EXPONENT) as i32) * jitter.max(0.0);
    let nanos = base.as_nanos() as f64 * factor;
    if nanos < u64::MAX as f64 {
        Duration::from_nanos(nanos.round() as u64)
    } else {
        Duration::try_from_secs_f64(nanos / 1e9).unwrap_or(Duration::MAX)
    }
}

/// [`backoff_delay`] with a jitter drawn uniformly from
/// `[JITTER_MIN, JITTER_MAX]`.
pub fn jittered_delay(base: Duration, attempt: u32) -> Duration {
    backoff_delay(base, attempt, random_jitter())
}

/// Inclusive bounds of [`jittered_delay`] for an attempt.
pub fn delay_bounds(base: Duration, attempt: u32) -> (Duration, Duration) {
    (
        backoff_delay(base, attempt, JITTER_MIN),
        backoff_delay(base, attempt, JITTER_MAX),
    )
}

fn random_jitter() -> f64 {
    rand::thread_rng().gen_range(JITTER_MIN..=JITTER_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_backoff_without_jitter_doubles() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0, 1.0), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 1, 1.0), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 2, 1.0), Duration::from_millis(400));
        assert_eq!(backoff_delay(base, 3, 1.0), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_bounds() {
        let (low, high) = delay_bounds(Duration::from_millis(1000), 2);
        assert_eq!(low, Duration::from_millis(3000));
        assert_eq!(high, Duration::from_millis(5000));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    #[case(10)]
    fn test_jittered_delay_within_bounds(#[case] attempt: u32) {
        let base = Duration::from_millis(1000);
        let (low, high) = delay_bounds(base, attempt);

        for _ in 0..500 {
            let delay = jittered_delay(base, attempt);
            assert!(delay >= low, "{delay:?} < {low:?}");
            assert!(delay <= high, "{delay:?} > {high:?}");
        }
    }

    #[test]
    fn test_jitter_varies() {
        let base = Duration::from_secs(1);
        let first = jittered_delay(base, 0);
        let varied = (0..100).any(|_| jittered_delay(base, 0) != first);
        assert!(varied);
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let delay = backoff_delay(Duration::from_secs(u64::MAX / 2), 1000, JITTER_MAX);
        assert_eq!(delay, Duration::MAX);
    }

    #[test]
    fn test_zero_base_delay() {
        assert_eq!(jittered_delay(Duration::ZERO, 5), Duration::ZERO);
    }
}
