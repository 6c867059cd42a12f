use std::time::Duration;

/// Maximum award for a correct answer submitted with a full timer.
pub const MAX_POINTS_PER_ROUND: i32 = 1000;

/// Convert a guess outcome and the time left on the clock into points.
/// Incorrect guesses earn nothing; correct guesses earn a share of
/// `max_points` proportional to the remaining time. Pure and deterministic.
/// The caller reads the timer at the instant of submission.
pub fn award(correct: bool, remaining: Duration, duration: Duration, max_points: i32) -> i32 {
    if !correct || duration.is_zero() {
        return 0;
    }
    let fraction = (remaining.as_millis() as f64 / duration.as_millis() as f64).clamp(0.0, 1.0);
    (fraction * f64::from(max_points)).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(10_000);

    #[test]
    fn incorrect_always_scores_zero() {
        assert_eq!(award(false, DURATION, DURATION, MAX_POINTS_PER_ROUND), 0);
        assert_eq!(award(false, Duration::ZERO, DURATION, MAX_POINTS_PER_ROUND), 0);
    }

    #[test]
    fn full_timer_scores_maximum() {
        assert_eq!(award(true, DURATION, DURATION, MAX_POINTS_PER_ROUND), 1000);
    }

    #[test]
    fn empty_timer_scores_zero() {
        assert_eq!(award(true, Duration::ZERO, DURATION, MAX_POINTS_PER_ROUND), 0);
    }

    #[test]
    fn award_is_proportional_and_rounded() {
        assert_eq!(
            award(true, Duration::from_millis(9_800), DURATION, MAX_POINTS_PER_ROUND),
            980
        );
        assert_eq!(
            award(true, Duration::from_millis(5_025), DURATION, MAX_POINTS_PER_ROUND),
            503
        );
    }

    #[test]
    fn remaining_above_duration_is_clamped() {
        assert_eq!(
            award(true, Duration::from_millis(20_000), DURATION, MAX_POINTS_PER_ROUND),
            1000
        );
    }

    #[test]
    fn zero_duration_scores_zero() {
        assert_eq!(award(true, Duration::ZERO, Duration::ZERO, MAX_POINTS_PER_ROUND), 0);
    }
}
