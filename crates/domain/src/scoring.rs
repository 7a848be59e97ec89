//! Answer scoring.
//!
//! A correct answer earns `round(max(0, 1000 * 0.9^elapsed_ms * tier))`.
//! The elapsed time is client-reported and deliberately not verified here;
//! the decay is monotonically decreasing, so inflated values only push the
//! award toward zero, never below it. A wrong answer is a flat -100.

use crate::value_objects::Difficulty;

/// Base award for an instant correct answer.
pub const BASE_POINTS: f64 = 1000.0;

/// Multiplicative decay applied per elapsed millisecond.
pub const DECAY_PER_MILLI: f64 = 0.9;

/// Flat penalty for an incorrect answer.
pub const WRONG_ANSWER_PENALTY: i64 = -100;

/// Score delta for one answer submission.
pub fn answer_points(correct: bool, elapsed_millis: u64, difficulty: Difficulty) -> i64 {
    if !correct {
        return WRONG_ANSWER_PENALTY;
    }
    let decayed = BASE_POINTS * DECAY_PER_MILLI.powf(elapsed_millis as f64);
    (decayed * difficulty.multiplier()).max(0.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_correct_answer_earns_full_base() {
        assert_eq!(answer_points(true, 0, Difficulty::Easy), 1000);
        assert_eq!(answer_points(true, 0, Difficulty::Medium), 1500);
        assert_eq!(answer_points(true, 0, Difficulty::Hard), 2000);
    }

    #[test]
    fn correct_answer_never_goes_negative() {
        // Large elapsed values decay the award to zero, not below it.
        assert_eq!(answer_points(true, 10_000, Difficulty::Hard), 0);
        assert!(answer_points(true, u64::MAX, Difficulty::Easy) >= 0);
    }

    #[test]
    fn award_decays_monotonically() {
        let fast = answer_points(true, 1, Difficulty::Medium);
        let slow = answer_points(true, 50, Difficulty::Medium);
        assert!(fast > slow);
        assert!(fast < 1500);
    }

    #[test]
    fn wrong_answer_is_flat_penalty() {
        assert_eq!(answer_points(false, 0, Difficulty::Easy), -100);
        assert_eq!(answer_points(false, 9999, Difficulty::Hard), -100);
    }
}
