//! Head & Shoulders detection stages
//!
//! The engine runs these left to right on every call:
//!
//! - **helpers**: series floor check, reference thresholds, volume/trend windows
//! - **peak**: local peak search over a closed index range
//! - **scanner**: three-window sweep producing shoulder/head/shoulder candidates
//! - **scorer**: head-dominance gate, confidence, strength and signal
//! - **dedupe**: collapses detections with nearby centers
//!
//! Each stage is a free function or a small `Copy` value with no state kept
//! between calls.

pub mod helpers;

pub mod dedupe;
pub mod peak;
pub mod scanner;
pub mod scorer;

// Re-export all stages for convenience
pub use dedupe::*;
pub use helpers::*;
pub use peak::*;
pub use scanner::*;
pub use scorer::*;
