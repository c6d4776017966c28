/// Whole-number percentage of `part` in `total`, 0 when `total` is 0.
///
/// Halves round away from zero, which for non-negative ratios is the same
/// as rounding half up.
pub fn round_pct(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Percentage of `part` in `total` rounded to one decimal, 0.0 when `total` is 0.
pub fn pct1(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_pct_with_zero_total() {
        assert_eq!(round_pct(10, 0), 0);
    }

    #[test]
    fn test_round_pct_rounds_half_up() {
        assert_eq!(round_pct(1, 3), 33);
        assert_eq!(round_pct(2, 3), 67);
        assert_eq!(round_pct(1, 8), 13);
        assert_eq!(round_pct(4, 4), 100);
    }

    #[test]
    fn test_pct1_one_decimal() {
        assert_eq!(pct1(1, 3), 33.3);
        assert_eq!(pct1(2, 3), 66.7);
        assert_eq!(pct1(1, 1), 100.0);
        assert_eq!(pct1(0, 0), 0.0);
    }
}
