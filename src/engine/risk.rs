//! Collapse-risk policy: baseline, per-placement growth, and trigger draws.

use rand::Rng;

/// Collapse risk at the start of a session or after a risk-triggered reset.
///
/// Experience works against the baseline: each point of experience shaves
/// `relief` off, floored at zero.
pub fn baseline_risk(baseline: f64, relief: f64, experience: u32) -> f64 {
    (baseline - experience as f64 * relief).max(0.0)
}

/// Risk added by one accepted placement, tiered by attempt number.
///
/// Early attempts grow risk slowly; the middle band is the steepest.
pub fn placement_increment(attempt: u32) -> f64 {
    match attempt {
        0..=4 => 0.005,
        5..=9 => 0.02,
        _ => 0.01,
    }
}

/// Applies one placement's worth of risk growth, capped at 1.0.
pub fn accumulate(risk: f64, attempt: u32) -> f64 {
    (risk + placement_increment(attempt)).min(1.0)
}

/// Draws the post-placement trigger check: `true` means a risk collapse fires.
pub fn trigger_fires<R: Rng>(rng: &mut R, risk: f64) -> bool {
    rng.r#gen::<f64>() < risk
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn baseline_drops_with_experience() {
        assert!(close(baseline_risk(0.2, 0.05, 0), 0.2));
        assert!(close(baseline_risk(0.2, 0.05, 1), 0.15));
        assert!(close(baseline_risk(0.2, 0.05, 4), 0.0));
    }

    #[test]
    fn baseline_never_negative() {
        for exp in 0..100 {
            assert!(baseline_risk(0.2, 0.05, exp) >= 0.0);
        }
    }

    #[test]
    fn increments_follow_attempt_bands() {
        assert_eq!(placement_increment(0), 0.005);
        assert_eq!(placement_increment(4), 0.005);
        assert_eq!(placement_increment(5), 0.02);
        assert_eq!(placement_increment(9), 0.02);
        assert_eq!(placement_increment(10), 0.01);
        assert_eq!(placement_increment(100), 0.01);
    }

    #[test]
    fn accumulate_caps_at_one() {
        assert_eq!(accumulate(0.999, 5), 1.0);
        assert_eq!(accumulate(1.0, 10), 1.0);
    }
}
