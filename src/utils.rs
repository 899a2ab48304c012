//! Step-count, index and timer arithmetic shared by the generator and the
//! playback controller.

use std::time::Duration;

/// Number of steps a trace for words of lengths `n1` and `n2` contains.
///
/// Bootstrap + row-0 fills + column-0 fills + (compare, resolve) per interior cell.
#[inline]
pub fn expected_step_count(n1: usize, n2: usize) -> usize {
    1 + n2 + n1 + 2 * n1 * n2
}

/// Clamp a signed navigation target into `[0, total - 1]`.
///
/// `total` is never zero for a generated trace; a zero total clamps to 0.
#[inline]
pub fn clamp_index(target: i64, total: usize) -> usize {
    let last = total.saturating_sub(1);
    if target <= 0 {
        0
    } else {
        usize::try_from(target).map_or(last, |t| t.min(last))
    }
}

/// Autoplay interval for a speed multiplier: `1000 / speed` milliseconds.
///
/// Saturates at [`Duration::MAX`] when the interval is not representable
/// (zero, negative, NaN or vanishingly small speeds).
#[inline]
pub fn tick_interval(speed: f64) -> Duration {
    Duration::try_from_secs_f64(1.0 / speed).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_small_cases() {
        assert_eq!(expected_step_count(0, 0), 1);
        assert_eq!(expected_step_count(0, 3), 4);
        assert_eq!(expected_step_count(3, 0), 4);
        assert_eq!(expected_step_count(5, 3), 1 + 3 + 5 + 30);
    }

    #[test]
    fn clamp_handles_both_ends() {
        assert_eq!(clamp_index(-5, 10), 0);
        assert_eq!(clamp_index(0, 10), 0);
        assert_eq!(clamp_index(4, 10), 4);
        assert_eq!(clamp_index(15, 10), 9);
        assert_eq!(clamp_index(i64::MAX, 10), 9);
        assert_eq!(clamp_index(3, 0), 0);
    }

    #[test]
    fn interval_scales_inversely() {
        assert_eq!(tick_interval(1.0), Duration::from_millis(1000));
        assert_eq!(tick_interval(2.0), Duration::from_millis(500));
        assert_eq!(tick_interval(0.5), Duration::from_millis(2000));
    }

    #[test]
    fn interval_saturates_instead_of_panicking() {
        assert_eq!(tick_interval(0.0), Duration::MAX);
        assert_eq!(tick_interval(-1.0), Duration::MAX);
        assert_eq!(tick_interval(f64::NAN), Duration::MAX);
        assert_eq!(tick_interval(1e-300), Duration::MAX);
    }
}
