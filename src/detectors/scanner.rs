//! Sliding three-window scan for shoulder/head/shoulder peak triples
//!
//! For each center index `i` the scanner queries three closed windows:
//!
//! ```text
//! left  [i - gap - span, i - gap]
//! head  [i - head_half_width, i + head_half_width]
//! right [i + gap, i + gap + span]
//! ```
//!
//! and emits a [`Candidate`] only when all three hold a verified peak.
//! Windows falling outside the series are skipped, never reported.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::peak::{find_local_peak, Peak};
use crate::{PatternError, Result};

/// Placement of the three search windows around a center index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    /// Head window covers `center ± head_half_width`
    pub head_half_width: usize,
    /// Distance from the center to the inner edge of each shoulder window
    pub shoulder_gap: usize,
    /// Index span of each shoulder window (window half-width)
    pub shoulder_span: usize,
    /// Centers are scanned over `[margin, len - margin)`
    pub margin: usize,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self::compact()
    }
}

impl WindowGeometry {
    /// Left `[i-8, i-4]`, head `[i-2, i+2]`, right `[i+4, i+8]`, centers `[10, len-10)`
    pub const fn compact() -> Self {
        Self {
            head_half_width: 2,
            shoulder_gap: 4,
            shoulder_span: 4,
            margin: 10,
        }
    }

    /// Wider frame for daily candles: left `[i-12, i-6]`, head `[i-3, i+3]`,
    /// right `[i+6, i+12]`, centers `[15, len-15)`
    pub const fn wide() -> Self {
        Self {
            head_half_width: 3,
            shoulder_gap: 6,
            shoulder_span: 6,
            margin: 15,
        }
    }

    /// Furthest offset from the center any window reaches
    #[inline]
    pub fn reach(&self) -> usize {
        self.shoulder_gap + self.shoulder_span
    }

    /// Center indices scanned for a series of `len` bars, ascending
    #[inline]
    pub fn centers(&self, len: usize) -> std::ops::Range<usize> {
        self.margin..len.saturating_sub(self.margin)
    }

    #[inline]
    pub fn left_window(&self, center: usize) -> Option<(usize, usize)> {
        let end = center.checked_sub(self.shoulder_gap)?;
        let start = end.checked_sub(self.shoulder_span)?;
        Some((start, end))
    }

    #[inline]
    pub fn head_window(&self, center: usize) -> Option<(usize, usize)> {
        let start = center.checked_sub(self.head_half_width)?;
        Some((start, center + self.head_half_width))
    }

    #[inline]
    pub fn right_window(&self, center: usize) -> Option<(usize, usize)> {
        let start = center + self.shoulder_gap;
        Some((start, start + self.shoulder_span))
    }

    /// Shoulder windows must not overlap the head window
    pub fn validate(&self) -> Result<()> {
        if self.shoulder_gap <= self.head_half_width {
            return Err(PatternError::InvalidConfig(format!(
                "shoulder_gap ({}) must exceed head_half_width ({})",
                self.shoulder_gap, self.head_half_width
            )));
        }
        Ok(())
    }
}

/// Three verified peaks around one center index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub left: Peak,
    pub head: Peak,
    pub right: Peak,
    pub center_index: usize,
}

/// Query the three windows around `center`.
pub fn candidate_at(prices: &[f64], geometry: &WindowGeometry, center: usize) -> Option<Candidate> {
    let peak_in = |window: Option<(usize, usize)>| {
        let (start, end) = window?;
        find_local_peak(prices, start, end).peak()
    };

    let left = peak_in(geometry.left_window(center))?;
    let head = peak_in(geometry.head_window(center))?;
    let right = peak_in(geometry.right_window(center))?;

    Some(Candidate {
        left,
        head,
        right,
        center_index: center,
    })
}

/// Every candidate triple in ascending center order.
pub fn scan(prices: &[f64], geometry: &WindowGeometry) -> Vec<Candidate> {
    geometry
        .centers(prices.len())
        .filter_map(|i| candidate_at(prices, geometry, i))
        .collect()
}

/// Same output as [`scan`], centers evaluated on the rayon pool.
/// Rayon's ordered collect keeps ascending center order.
pub fn scan_par(prices: &[f64], geometry: &WindowGeometry) -> Vec<Candidate> {
    geometry
        .centers(prices.len())
        .into_par_iter()
        .filter_map(|i| candidate_at(prices, geometry, i))
        .collect()
}
