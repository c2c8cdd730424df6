//! Local peak search over a closed index range

use serde::{Deserialize, Serialize};

/// A verified local maximum of the close series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub index: usize,
    pub value: f64,
}

/// Outcome of a peak query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeakSearch {
    /// Verified peak inside the range
    Found(Peak),
    /// Range empty or reaching past the end of the series
    OutOfRange,
    /// Range maximum has a non-decreasing interior neighbour
    Unresolved,
}

impl PeakSearch {
    #[inline]
    pub fn peak(self) -> Option<Peak> {
        match self {
            PeakSearch::Found(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn is_found(self) -> bool {
        matches!(self, PeakSearch::Found(_))
    }
}

/// Find the local peak of `prices` in the closed range `[start, end]`.
///
/// The maximum is taken with first-occurrence tie breaking. It is accepted
/// only if both neighbours are strictly lower, except that the check is waived
/// on a side where the maximum sits on the range edge. A maximum still rising
/// into the edge is therefore accepted as a peak; scoring relies on that.
pub fn find_local_peak(prices: &[f64], start: usize, end: usize) -> PeakSearch {
    if start > end || end >= prices.len() {
        return PeakSearch::OutOfRange;
    }

    let mut index = start;
    let mut value = prices[start];
    for (i, &p) in prices.iter().enumerate().take(end + 1).skip(start + 1) {
        if p > value {
            value = p;
            index = i;
        }
    }

    let left_ok = index == start || prices[index - 1] < value;
    let right_ok = index == end || prices[index + 1] < value;

    if left_ok && right_ok {
        PeakSearch::Found(Peak { index, value })
    } else {
        PeakSearch::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_peak() {
        let prices = [1.0, 3.0, 5.0, 4.0, 2.0];
        assert_eq!(
            find_local_peak(&prices, 0, 4),
            PeakSearch::Found(Peak { index: 2, value: 5.0 })
        );
    }

    #[test]
    fn test_out_of_range() {
        let prices = [1.0, 2.0, 3.0];
        assert_eq!(find_local_peak(&prices, 1, 3), PeakSearch::OutOfRange);
        assert_eq!(find_local_peak(&prices, 2, 1), PeakSearch::OutOfRange);
        assert_eq!(find_local_peak(&[], 0, 0), PeakSearch::OutOfRange);
    }

    #[test]
    fn test_singleton_always_found() {
        let prices = [5.0, 9.0, 5.0];
        let found = find_local_peak(&prices, 0, 0).peak().unwrap();
        assert_eq!(found.index, 0);
        // edge waiver applies on both sides
        assert!(find_local_peak(&prices, 2, 2).is_found());
    }

    #[test]
    fn test_edge_waiver_accepts_rising_edge() {
        // still rising at the window's right edge
        let prices = [1.0, 2.0, 3.0, 4.0, 5.0];
        let peak = find_local_peak(&prices, 0, 2).peak().unwrap();
        assert_eq!(peak.index, 2);
        assert_eq!(peak.value, 3.0);
    }

    #[test]
    fn test_first_tie_wins_and_plateau_unresolved() {
        // plateau: maximum's right neighbour is equal
        let prices = [1.0, 5.0, 5.0, 1.0];
        assert_eq!(find_local_peak(&prices, 0, 3), PeakSearch::Unresolved);

        // tie separated by a dip: first occurrence wins
        let prices = [1.0, 5.0, 2.0, 5.0, 1.0];
        let peak = find_local_peak(&prices, 0, 4).peak().unwrap();
        assert_eq!(peak.index, 1);
    }

    #[test]
    fn test_flat_range_at_start_edge() {
        // max at start (edge waived) but right neighbour equal
        let prices = [3.0, 3.0, 3.0];
        assert_eq!(find_local_peak(&prices, 0, 2), PeakSearch::Unresolved);
    }
}
