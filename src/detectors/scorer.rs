//! Head & Shoulders validity gate and scoring
//!
//! The only hard criterion is head dominance: the head must close strictly
//! above both shoulders. Everything else shapes confidence, strength and the
//! directional label.

use serde::{Deserialize, Serialize};

use super::helpers::{
    is_rising_into, window_avg_volume, BASE_CONFIDENCE, MAX_CONFIDENCE, SHOULDER_SIMILARITY,
    SIMILARITY_BONUS, VOLUME_BONUS, VOLUME_CONFIRM_FACTOR,
};
use super::peak::Peak;
use super::scanner::Candidate;
use crate::{Pattern, PatternKind, Ratio, Signal, Strength, OHLCV};

/// Turns a peak triple into a scored [`Pattern`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternScorer {
    /// Shoulders closer than this fraction of the higher one earn the similarity bonus
    pub shoulder_similarity: Ratio,
}

impl Default for PatternScorer {
    fn default() -> Self {
        Self {
            shoulder_similarity: Ratio::new_const(SHOULDER_SIMILARITY),
        }
    }
}

impl PatternScorer {
    pub fn new(shoulder_similarity: Ratio) -> Self {
        Self {
            shoulder_similarity,
        }
    }

    /// Score a peak triple centred on `center_index`. `None` unless the head
    /// strictly dominates both shoulders.
    pub fn score<T: OHLCV>(
        &self,
        left: Peak,
        head: Peak,
        right: Peak,
        center_index: usize,
        bars: &[T],
    ) -> Option<Pattern> {
        if !(head.value > left.value && head.value > right.value) {
            return None;
        }

        let mut confidence = BASE_CONFIDENCE;
        if shoulders_similar(left.value, right.value, self.shoulder_similarity.get()) {
            confidence += SIMILARITY_BONUS;
        }
        if volume_confirms(bars, head.index, center_index) {
            confidence += VOLUME_BONUS;
        }

        let strength = Strength::from_dominance(head_dominance(left.value, head.value, right.value));

        let (kind, signal) = if is_rising_into(bars, center_index) {
            (PatternKind::Top, Signal::BearishReversal)
        } else {
            (PatternKind::Bottom, Signal::ContinuationPattern)
        };

        Some(Pattern {
            kind,
            left_shoulder_price: left.value,
            head_price: head.value,
            right_shoulder_price: right.value,
            confidence: confidence.min(MAX_CONFIDENCE),
            signal,
            strength,
            center_index,
            start_index: left.index,
            end_index: right.index,
        })
    }

    #[inline]
    pub fn score_candidate<T: OHLCV>(&self, candidate: &Candidate, bars: &[T]) -> Option<Pattern> {
        self.score(
            candidate.left,
            candidate.head,
            candidate.right,
            candidate.center_index,
            bars,
        )
    }
}

/// `|left - right| / max(left, right) < threshold`
#[inline]
pub fn shoulders_similar(left: f64, right: f64, threshold: f64) -> bool {
    let higher = left.max(right);
    higher > 0.0 && (left - right).abs() / higher < threshold
}

/// How far the head clears the higher shoulder, as a fraction of the head
#[inline]
pub fn head_dominance(left: f64, head: f64, right: f64) -> f64 {
    if head <= 0.0 {
        return 0.0;
    }
    (head - left.max(right)) / head
}

/// Head bar volume exceeds 1.2x the average around the center.
/// A head bar with no recorded volume never confirms.
pub fn volume_confirms<T: OHLCV>(bars: &[T], head_index: usize, center_index: usize) -> bool {
    let Some(head_volume) = bars.get(head_index).and_then(|b| b.volume()) else {
        return false;
    };
    window_avg_volume(bars, center_index)
        .is_some_and(|avg| head_volume > avg * VOLUME_CONFIRM_FACTOR)
}
