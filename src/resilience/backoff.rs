//! Exponential backoff schedule.

use std::time::Duration;

/// Delay to wait after the `failures`-th consecutive failure.
///
/// The wait before attempt `k + 1` is `unit * factor^k`, so with the default
/// factor of 2.0 and a one second unit the waits are 2s, 4s, 8s, ...
pub fn calculate_backoff(failures: u32, factor: f64, unit: Duration) -> Duration {
    if failures == 0 {
        return Duration::ZERO;
    }

    let exponent = i32::try_from(failures).unwrap_or(i32::MAX);
    let multiplier = factor.powi(exponent);
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Duration::MAX;
    }

    let nanos = (unit.as_nanos() as f64 * multiplier).round();
    if nanos >= u64::MAX as f64 {
        return Duration::MAX;
    }
    Duration::from_nanos(nanos as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let unit = Duration::from_secs(1);
        assert_eq!(calculate_backoff(0, 2.0, unit), Duration::ZERO);
        assert_eq!(calculate_backoff(1, 2.0, unit), Duration::from_secs(2));
        assert_eq!(calculate_backoff(2, 2.0, unit), Duration::from_secs(4));
        assert_eq!(calculate_backoff(3, 2.0, unit), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_respects_unit_and_factor() {
        let unit = Duration::from_millis(10);
        assert_eq!(calculate_backoff(2, 3.0, unit), Duration::from_millis(90));
        assert_eq!(calculate_backoff(4, 1.0, unit), Duration::from_millis(10));
    }

    #[test]
    fn test_backoff_saturates() {
        let max = calculate_backoff(10_000, 2.0, Duration::from_secs(1));
        assert_eq!(max, Duration::MAX);
    }
}
