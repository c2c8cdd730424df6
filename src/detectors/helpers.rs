//! Common constants and series helpers shared by the detection stages
//!
//! Reference thresholds for the Head & Shoulders rule and the small slice
//! utilities every stage builds on.

use crate::OHLCV;

// ============================================================
// REFERENCE THRESHOLDS
// ============================================================

/// Series shorter than this never produce a pattern. Fixed floor, not configurable.
pub const MIN_SERIES_LEN: usize = 20;

/// Score every accepted pattern starts from
pub const BASE_CONFIDENCE: u8 = 60;
/// Upper bound on the final score
pub const MAX_CONFIDENCE: u8 = 95;
/// Added when shoulders are within the similarity threshold
pub const SIMILARITY_BONUS: u8 = 20;
/// Added when the head bar trades on elevated volume
pub const VOLUME_BONUS: u8 = 10;

/// Shoulders are similar when `|l - r| / max(l, r)` is below this
pub const SHOULDER_SIMILARITY: f64 = 0.05;

/// Head volume must exceed the window average by this factor
pub const VOLUME_CONFIRM_FACTOR: f64 = 1.2;
/// Volume used in the average for bars that carry none
pub const DEFAULT_VOLUME: f64 = 1_000_000.0;
/// Bars on each side of the center for the volume average: `[c-5, c+5)`
pub const VOLUME_HALF_WINDOW: usize = 5;

/// Closes examined for the preceding trend: `[c-5, c+1)`
pub const TREND_LOOKBACK: usize = 5;

/// Dominance ratio at or below which a pattern is Weak
pub const WEAK_DOMINANCE: f64 = 0.05;
/// Dominance ratio at or below which a pattern is Moderate
pub const MODERATE_DOMINANCE: f64 = 0.1;

/// Centers closer than this collapse into one detection
pub const DEDUPE_DISTANCE: usize = 5;

// ============================================================
// SERIES HELPERS
// ============================================================

/// Series floor check. Returns the series when long enough to scan,
/// `None` when it is too short to hold two shoulders and a head.
#[inline]
pub fn validate_series<T: OHLCV>(bars: &[T]) -> Option<&[T]> {
    (bars.len() >= MIN_SERIES_LEN).then_some(bars)
}

/// Close prices of the series, in index order
#[inline]
pub fn closes<T: OHLCV>(bars: &[T]) -> Vec<f64> {
    bars.iter().map(|b| b.close()).collect()
}

/// Average volume over `[center - 5, center + 5)`, clamped to the series.
/// Missing volume counts as [`DEFAULT_VOLUME`]. Returns `None` for an empty window.
pub fn window_avg_volume<T: OHLCV>(bars: &[T], center: usize) -> Option<f64> {
    let start = center.saturating_sub(VOLUME_HALF_WINDOW);
    let end = (center + VOLUME_HALF_WINDOW).min(bars.len());
    if start >= end {
        return None;
    }
    let slice = &bars[start..end];
    let sum: f64 = slice
        .iter()
        .map(|b| b.volume().unwrap_or(DEFAULT_VOLUME))
        .sum();
    Some(sum / slice.len() as f64)
}

/// True if the closes in `[center - 5, center + 1)` end higher than they start.
pub fn is_rising_into<T: OHLCV>(bars: &[T], center: usize) -> bool {
    let start = center.saturating_sub(TREND_LOOKBACK);
    let end = (center + 1).min(bars.len());
    if start >= end {
        return false;
    }
    let window = &bars[start..end];
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => last.close() > first.close(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricePoint;

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        closes.iter().map(|&c| PricePoint::from_close(c)).collect()
    }

    #[test]
    fn test_validate_series_floor() {
        assert!(validate_series(&series(&[100.0; 19])).is_none());
        assert!(validate_series(&series(&[100.0; 20])).is_some());
    }

    #[test]
    fn test_avg_volume_defaults_missing() {
        let mut bars = series(&[100.0; 20]);
        for b in bars.iter_mut().take(10) {
            b.volume = Some(2_000_000.0);
        }
        // [5, 15): five bars at 2M, five defaulted to 1M
        let avg = window_avg_volume(&bars, 10).unwrap();
        assert!((avg - 1_500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_avg_volume_clamps_to_series() {
        let bars = series(&[100.0; 3]);
        assert_eq!(window_avg_volume(&bars, 1), Some(DEFAULT_VOLUME));
        assert_eq!(window_avg_volume(&bars, 10), None);
    }

    #[test]
    fn test_rising_into_center() {
        let bars = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert!(is_rising_into(&bars, 6));
        let bars = series(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        assert!(!is_rising_into(&bars, 6));
        // single close cannot rise
        assert!(!is_rising_into(&bars, 0));
    }
}
