//! Collapsing overlapping detections
//!
//! Neighbouring center indices usually describe the same pattern seen through
//! slightly shifted windows. The filter is greedy and pairwise: a pattern is
//! dropped when its center lies within `distance` of a pattern already kept.
//! It does not chain clusters transitively.

use serde::{Deserialize, Serialize};

use crate::Pattern;

/// Which member of a cluster survives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DedupeStrategy {
    /// First pattern in scan order
    #[default]
    FirstWins,
    /// Highest confidence, ties broken by scan order. Output is still ordered by center.
    HighestConfidence,
}

/// First-wins filter over patterns in scan order.
pub fn dedupe(patterns: &[Pattern], distance: usize) -> Vec<Pattern> {
    let mut kept: Vec<Pattern> = Vec::with_capacity(patterns.len());
    for p in patterns {
        let overlaps = kept
            .iter()
            .any(|k| k.center_index.abs_diff(p.center_index) < distance);
        if !overlaps {
            kept.push(*p);
        }
    }
    kept
}

/// Deduplicate with the given survivor rule.
pub fn dedupe_with(patterns: &[Pattern], distance: usize, strategy: DedupeStrategy) -> Vec<Pattern> {
    match strategy {
        DedupeStrategy::FirstWins => dedupe(patterns, distance),
        DedupeStrategy::HighestConfidence => {
            let mut ranked = patterns.to_vec();
            // stable: equal confidence keeps scan order
            ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence));
            let mut kept = dedupe(&ranked, distance);
            kept.sort_by_key(|p| p.center_index);
            kept
        }
    }
}
