// Overall score aggregation. Weights are fixed and sum to 1.0.

pub const TECHNICAL_WEIGHT: f64 = 0.25;
pub const ONPAGE_WEIGHT: f64 = 0.25;
pub const PERFORMANCE_WEIGHT: f64 = 0.25;
pub const SECURITY_WEIGHT: f64 = 0.10;
pub const MOBILE_WEIGHT: f64 = 0.15;

/// Weighted average of the five analyzer scores, rounded half away
/// from zero. Inputs are already clamped to 0..=100 by the analyzers.
pub fn overall_score(
    technical: u32,
    on_page: u32,
    performance: u32,
    security: u32,
    mobile: u32,
) -> u32 {
    let weighted = technical as f64 * TECHNICAL_WEIGHT
        + on_page as f64 * ONPAGE_WEIGHT
        + performance as f64 * PERFORMANCE_WEIGHT
        + security as f64 * SECURITY_WEIGHT
        + mobile as f64 * MOBILE_WEIGHT;

    weighted.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_scores_pass_through() {
        assert_eq!(overall_score(80, 80, 80, 80, 80), 80);
        assert_eq!(overall_score(100, 100, 100, 100, 100), 100);
        assert_eq!(overall_score(0, 0, 0, 0, 0), 0);
    }

    #[test]
    fn half_rounds_up() {
        // 0.25 * 82 + 0.25 * 80 + 0.25 * 80 + 0.10 * 80 + 0.15 * 80 = 80.5
        assert_eq!(overall_score(82, 80, 80, 80, 80), 81);
    }

    #[test]
    fn weights_match_their_shares() {
        // Only the security analyzer at zero costs 10 points
        assert_eq!(overall_score(100, 100, 100, 0, 100), 90);
        // Only mobile at zero costs 15
        assert_eq!(overall_score(100, 100, 100, 100, 0), 85);
        // Each 25% analyzer at zero costs 25
        assert_eq!(overall_score(0, 100, 100, 100, 100), 75);
    }

    #[test]
    fn raising_any_input_never_lowers_the_result() {
        let base = overall_score(50, 60, 70, 80, 90);
        assert!(overall_score(60, 60, 70, 80, 90) >= base);
        assert!(overall_score(50, 70, 70, 80, 90) >= base);
        assert!(overall_score(50, 60, 80, 80, 90) >= base);
    }
}
